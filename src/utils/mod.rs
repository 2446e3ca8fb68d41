pub mod currency;

pub use currency::{format_inr, CURRENCY_SYMBOL};
