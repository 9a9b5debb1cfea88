// Small nom parsers for the string-typed parts of inbound records

pub mod color;
pub mod label;

// Public API re-exports
pub use color::parse_hex_color;
pub use label::{compare_group_labels, leading_number};
