pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

pub use html::Extractor;
pub use text::{CleanOptions, clean, clean_review};
