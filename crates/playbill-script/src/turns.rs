//! Speaker-turn extraction.

use std::sync::LazyLock;

use playbill_core::Turn;
use regex::Regex;
use tracing::{debug, warn};

use crate::scene::{split_scenes, strip_stage_directions};

/// A speaker line: a whole line of capital letters and spaces.
static SPEAKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[A-Z][A-Z ]*\n").unwrap());

/// The turns of one scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneTurns {
    /// Scene index within the work.
    pub index: usize,
    /// Turns in script order.
    pub turns: Vec<Turn>,
}

/// Split a scene into turns.
///
/// Each turn runs from a speaker line up to the next speaker line (or the
/// end of the scene). Text before the first speaker line is discarded.
pub fn extract_turns(scene: &str) -> Vec<Turn> {
    let starts: Vec<usize> = SPEAKER.find_iter(scene).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = starts.get(k + 1).copied().unwrap_or(scene.len());
            Turn::new(&scene[start..end])
        })
        .collect()
}

/// Parse a whole work into scenes of turns.
///
/// Scenes that contain no speaker turns after stage directions are removed
/// are skipped with a warning; the remaining scenes keep their original
/// index, so gaps in the numbering mark skipped scenes.
pub fn parse_script(text: &str) -> Vec<SceneTurns> {
    let mut text = text.replace("\r\n", "\n");
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    let scenes = split_scenes(&text);
    let total = scenes.len();

    scenes
        .into_iter()
        .filter_map(|scene| {
            let stripped = strip_stage_directions(&scene.text);
            let turns = extract_turns(&stripped);
            if turns.is_empty() {
                warn!(scene = scene.index, "scene has no dialogue, skipping");
                return None;
            }
            debug!(scene = scene.index, total, turns = turns.len(), "parsed scene");
            Some(SceneTurns {
                index: scene.index,
                turns,
            })
        })
        .collect()
}
