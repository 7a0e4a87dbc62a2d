/* Common utilites for handlers. */

// Formats an amount with '.' as thousands separator, e.g. 1250000 -> 1.250.000.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        formatted.push('-');
    }

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(digit);
    }

    formatted
}

// Parses a chat user id as given in a command argument.
pub fn parse_user_id(text: &str) -> Option<u64> {
    text.trim_start_matches('@').parse().ok()
}
