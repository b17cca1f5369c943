//! # playbill-script
//!
//! Turns raw play-script text into ordered scenes of speaker turns.
//!
//! Parsing is line-oriented and assumes the usual plain-text layout of
//! public-domain play editions:
//!
//! ```text
//! ACT I
//! SCENE I. Elsinore. A platform before the castle.
//! Enter BERNARDO and FRANCISCO
//! BERNARDO
//! Who's there?
//! FRANCISCO
//! Nay, answer me: stand, and unfold yourself.
//! Exeunt
//! ```
//!
//! 1. [`split_scenes`] cuts the text at `ACT`/`SCENE` heading lines.
//! 2. [`strip_stage_directions`] removes `Enter`/`Exit`/`Exeunt` lines.
//! 3. [`extract_turns`] groups each all-caps speaker line with the text
//!    that follows it.
//!
//! [`parse_script`] runs all three.

#![deny(unsafe_code)]

pub mod scene;
pub mod turns;

pub use scene::{Scene, split_scenes, strip_stage_directions};
pub use turns::{SceneTurns, extract_turns, parse_script};
