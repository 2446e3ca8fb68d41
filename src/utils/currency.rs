// ============================================================================
// Currency Formatting
// ============================================================================
//
// Amounts are whole Indian Rupees. Display uses Indian digit grouping:
// the last three digits, then groups of two (₹12,34,567).
//
// ============================================================================

pub const CURRENCY_SYMBOL: &str = "₹";

pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{}{}{}", sign, CURRENCY_SYMBOL, digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{}{}{},{}", sign, CURRENCY_SYMBOL, groups.join(","), tail)
}
