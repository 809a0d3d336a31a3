/// Render a value with a currency prefix and a fixed number of decimals
///
/// Negative values keep the sign after the prefix: `-5` becomes "$-5.00".
pub fn format_currency(prefix: &str, decimals: usize, value: f64) -> String {
    format!("{}{:.*}", prefix, decimals, value)
}

/// Render a value as US dollars with two decimals, e.g. "$1234.50"
pub fn format_usd(value: f64) -> String {
    format_currency("$", 2, value)
}
