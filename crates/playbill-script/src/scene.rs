//! Scene splitting and stage-direction removal.

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^(?:ACT|SCENE)[\w .?"'\-,;]*\n"#).unwrap());

static ENTRANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*Enter [\w .?\-'",;]+\n"#).unwrap());

static EXIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*(?:Exit|Exeunt)[\w .?\-'",;]*\n"#).unwrap());

/// A scene body with its heading removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Position among the non-empty scenes of the work (the preamble before
    /// the first heading, if any, is scene 0).
    pub index: usize,
    /// Scene text, stage directions still included.
    pub text: String,
}

/// Split a work into scenes at `ACT`/`SCENE` heading lines.
///
/// Headings are dropped. Segments that are empty or whitespace-only (such as
/// the gap between `ACT II` and `SCENE I`) are not scenes and take no index.
pub fn split_scenes(text: &str) -> Vec<Scene> {
    HEADING
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .enumerate()
        .map(|(index, segment)| Scene {
            index,
            text: segment.to_string(),
        })
        .collect()
}

/// Remove entrance and exit lines from a scene.
pub fn strip_stage_directions(scene: &str) -> String {
    let without_entrances = ENTRANCE.replace_all(scene, "");
    EXIT.replace_all(&without_entrances, "").into_owned()
}
