//! # playbill-tokens
//!
//! Token counting for context windows.
//!
//! The window builder only needs `count(text) -> usize`; this crate puts that
//! behind the [`TokenCounter`] trait so the pipeline can run against:
//!
//! - [`HfTokenCounter`]: a Hugging Face `tokenizer.json`, loaded from disk
//!   or downloaded by model id (feature `hf`)
//! - [`WhitespaceCounter`]: whitespace-delimited word count
//! - any `Fn(&str) -> usize` closure

#![deny(unsafe_code)]

pub mod counter;
pub mod errors;
#[cfg(feature = "hf")]
pub mod hf;

pub use counter::{TokenCounter, WhitespaceCounter};
pub use errors::{Result, TokenError};
#[cfg(feature = "hf")]
pub use hf::HfTokenCounter;
