pub mod blocks;
pub mod engine;
pub mod escape;
pub mod inline;

pub use blocks::{CodeBlockContext, DIFF_LANGUAGE};
pub use engine::{render, render_html};
