//! Table rendering for non-interactive output.

pub mod md;

pub use md::{render_markdown, write_markdown, write_submission};
