// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Pure, synchronous domain code. Actors and metrics live outside this layer
// and call into it.
//
// ============================================================================

pub mod order;
