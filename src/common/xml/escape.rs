use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

/// Escape a string for use as XML element text content.
///
/// Only `&`, `<` and `>` are replaced; quotes are legal in text nodes and are
/// left alone so that record content reads the same as the spreadsheet cell.
///
/// # Examples
///
/// ```
/// use bindline::common::xml::escape_text;
/// assert_eq!(escape_text("a & b"), "a &amp; b");
/// assert_eq!(escape_text("<tag>\"hi\"</tag>"), "&lt;tag&gt;\"hi\"&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Check whether `name` is usable as an XML element name.
///
/// Accepts the ASCII subset of the XML `Name` production plus any non-ASCII
/// alphanumeric character. Names starting with `xml` are accepted; the
/// reservation is advisory and parsers do not enforce it.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
