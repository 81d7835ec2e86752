//! Fixed-width numeric segments of the barcode payload.

/// Trim-off-head segment. Always 3 mm.
pub const TRIM_OFF_HEAD: &str = "0030";

/// Endsheet height placeholder. Always zero.
pub const ENDSHEET_HEIGHT: &str = "0000";

/// Number of digits in a normalized ISBN.
pub const ISBN_LEN: usize = 13;

/// Render `value` in decimal, left-padded with `'0'` to `width` characters.
///
/// Values that already need more than `width` digits are not truncated.
pub fn pad_zeros(value: i64, width: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(value);
    format!("{:0>width$}", digits, width = width)
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Spine segment: the rounded spine followed by `'0'`.
///
/// Single-digit values get a leading zero so the segment is 3 characters
/// for every spine below 100 mm.
pub fn spine_segment(spine: f64) -> String {
    let rounded = round_half_up(spine);
    if rounded >= 10 {
        format!("{}0", rounded)
    } else {
        format!("0{}0", rounded)
    }
}

/// Dimension segment used for cut-off, trim height and trim width: the
/// rounded value padded to 3 digits followed by `'0'`.
pub fn dimension_segment(value: f64) -> String {
    let mut segment = pad_zeros(round_half_up(value), 3);
    segment.push('0');
    segment
}

/// Keep only the digits of `raw`, truncated or left-padded to 13.
pub fn normalize_isbn(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > ISBN_LEN {
        digits.truncate(ISBN_LEN);
        digits
    } else {
        format!("{:0>width$}", digits, width = ISBN_LEN)
    }
}
