//! # playbill-core
//!
//! Shared vocabulary for the playbill crates:
//!
//! - **Turns**: [`Turn`], one speaker-labelled utterance from a scene
//! - **Records**: [`DialogueRecord`], a context/response training example
//! - **Work profiles**: [`WorkProfile`], per-scene token lengths of one play
//! - **Logging**: `tracing` subscriber setup and an in-memory capture layer
//!   for tests

#![deny(unsafe_code)]

pub mod constants;
pub mod logging;
pub mod types;

pub use types::{DialogueRecord, Turn, WorkProfile};
