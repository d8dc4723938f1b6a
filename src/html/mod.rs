//! HTML module for turning posting descriptions into plain text

mod text;

pub use text::{collapse_whitespace, html_to_text};
