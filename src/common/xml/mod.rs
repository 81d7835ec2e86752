//! XML text helpers shared by the record builder.

mod escape;

pub use escape::{escape_text, is_valid_element_name};
