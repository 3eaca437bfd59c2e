//! Lenient string-to-number coercion for OCR'd and hand-typed metric values

/// Parse a number out of a loosely formatted value such as `"10,000"`,
/// `"4.5%"` or `"12k views"`.
///
/// Every character other than an ASCII digit or `.` is dropped before
/// parsing. Returns `None` when nothing numeric is left (`""`, `"."`,
/// `"1.2.3"`), never panics.
pub fn lenient_number(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse::<f64>().ok()
}

/// Reduce a word to the characters that can make up a metric value:
/// ASCII digits, `.` and `%`.
pub fn strip_metric_value(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '%')
        .collect()
}
