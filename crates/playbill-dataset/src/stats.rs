//! Dataset statistics.

use std::path::Path;

use playbill_core::Turn;
use playbill_core::types::DialogueRecord;
use playbill_tokens::TokenCounter;
use tracing::debug;

use crate::errors::Result;
use crate::files::collect_files;
use crate::jsonl::read_json_lines;

/// Largest `context_length` among records that still carry one.
pub fn longest_context(records: &[DialogueRecord]) -> Option<usize> {
    records.iter().filter_map(|r| r.context_length).max()
}

/// Tokens in every context and response under a records directory.
pub fn total_training_tokens<C>(dir: &Path, counter: &C, extension: &str) -> Result<usize>
where
    C: TokenCounter + ?Sized,
{
    let mut total = 0;
    for path in collect_files(dir, extension)? {
        let records: Vec<DialogueRecord> = read_json_lines(&path)?;
        for record in &records {
            total += counter.count(&record.context)? + counter.count(&record.response)?;
        }
    }
    debug!(dir = %dir.display(), total, "counted training tokens");
    Ok(total)
}

/// Tokens in the raw dialogue under a turns directory, each turn counted
/// once.
pub fn total_dataset_tokens<C>(dir: &Path, counter: &C, extension: &str) -> Result<usize>
where
    C: TokenCounter + ?Sized,
{
    let mut total = 0;
    for path in collect_files(dir, extension)? {
        let turns: Vec<Turn> = read_json_lines(&path)?;
        for turn in &turns {
            total += counter.count(turn.as_str())?;
        }
    }
    debug!(dir = %dir.display(), total, "counted dataset tokens");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonl::write_json_lines;
    use playbill_tokens::WhitespaceCounter;

    fn record(context: &str, response: &str, length: Option<usize>) -> DialogueRecord {
        DialogueRecord {
            taskname: "eme-seq2seq".into(),
            context: context.into(),
            response: response.into(),
            context_length: length,
        }
    }

    #[test]
    fn longest_ignores_missing_lengths() {
        let records = vec![
            record("a", "b", Some(3)),
            record("a", "b", None),
            record("a", "b", Some(11)),
        ];
        assert_eq!(longest_context(&records), Some(11));
        assert_eq!(longest_context(&[record("a", "b", None)]), None);
        assert_eq!(longest_context(&[]), None);
    }

    #[test]
    fn training_tokens_sum_contexts_and_responses() {
        let dir = tempfile::tempdir().unwrap();
        write_json_lines(
            &dir.path().join("train/hamlet/dialogues_0.json"),
            &[record("A: hi\n", "B: hello there\n", Some(2))],
        )
        .unwrap();
        write_json_lines(
            &dir.path().join("val/lear/dialogues_0.json"),
            &[record("C: one two\n", "D: three\n", None)],
        )
        .unwrap();

        let total = total_training_tokens(dir.path(), &WhitespaceCounter, ".json").unwrap();
        assert_eq!(total, 2 + 3 + 3 + 2);
    }

    #[test]
    fn dataset_tokens_count_each_turn_once() {
        let dir = tempfile::tempdir().unwrap();
        write_json_lines(
            &dir.path().join("hamlet/dialogues_0.json"),
            &[Turn::new("HAMLET\nTo be\n"), Turn::new("OPHELIA\nMy lord\n")],
        )
        .unwrap();
        write_json_lines::<Turn>(&dir.path().join("hamlet/dialogues_1.json"), &[]).unwrap();

        let total = total_dataset_tokens(dir.path(), &WhitespaceCounter, ".json").unwrap();
        assert_eq!(total, 6);
    }
}
