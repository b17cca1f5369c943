//! Context-window construction.
//!
//! For a scene of turns `t0, t1, ..., tn` the builder emits one record per
//! turn from `t1` on:
//!
//! ```text
//! t0                 -> t1      (never truncated)
//! t0 t1              -> t2
//! t0 t1 t2           -> t3
//! ...
//! t0 ... t(n-1)      -> tn
//! ```
//!
//! When a joined context exceeds the budget, whole turns are dropped from
//! the oldest end until it fits or only the immediately preceding turn is
//! left. A single turn that is still over budget is kept as is.

use playbill_core::Turn;
use playbill_core::constants::TURN_SEPARATOR;
use playbill_core::types::DialogueRecord;
use playbill_tokens::TokenCounter;
use tracing::{debug, trace};

use crate::errors::WindowError;

/// Fewest turns that yield a context/response pair.
pub const MIN_TURNS: usize = 2;

/// A context that has been fitted to the token budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FittedContext {
    /// Joined turn text.
    pub text: String,
    /// Token count of `text`.
    pub length: usize,
    /// Number of oldest turns dropped to fit.
    pub dropped: usize,
}

/// Join turns with the context separator.
pub fn join_turns(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(Turn::as_str)
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

/// Fit `history` into `max_tokens` by dropping turns from the front.
///
/// `history` must be non-empty. The last turn is never dropped, so the
/// result can exceed the budget when that turn alone does.
pub fn fit_context<C>(
    history: &[Turn],
    max_tokens: usize,
    counter: &C,
) -> Result<FittedContext, WindowError>
where
    C: TokenCounter + ?Sized,
{
    let mut start = 0;
    let mut text = join_turns(history);
    let mut length = counter.count(&text)?;

    while length > max_tokens && start + 1 < history.len() {
        start += 1;
        text = join_turns(&history[start..]);
        length = counter.count(&text)?;
        trace!(start, length, max_tokens, "truncating context");
    }

    Ok(FittedContext {
        text,
        length,
        dropped: start,
    })
}

/// Builds the dialogue records of a scene.
#[derive(Clone, Debug)]
pub struct ContextWindowBuilder {
    max_tokens: usize,
    taskname: String,
}

impl ContextWindowBuilder {
    /// Create a builder with a context budget and the task name to stamp on
    /// each record.
    pub fn new(max_tokens: usize, taskname: impl Into<String>) -> Self {
        Self {
            max_tokens,
            taskname: taskname.into(),
        }
    }

    /// Context budget in tokens.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Task name stamped on records.
    pub fn taskname(&self) -> &str {
        &self.taskname
    }

    /// Build `turns.len() - 1` records in turn order.
    ///
    /// The first record pairs `turns[0]` with `turns[1]` without checking
    /// the budget. Every later record's context is fitted with
    /// [`fit_context`].
    pub fn build<C>(&self, turns: &[Turn], counter: &C) -> Result<Vec<DialogueRecord>, WindowError>
    where
        C: TokenCounter + ?Sized,
    {
        if turns.len() < MIN_TURNS {
            return Err(WindowError::TooFewTurns { found: turns.len() });
        }
        if self.max_tokens == 0 {
            return Err(WindowError::ZeroBudget);
        }

        let mut records = Vec::with_capacity(turns.len() - 1);

        let opening = turns[0].text.clone();
        let opening_length = counter.count(&opening)?;
        records.push(self.record(opening, &turns[1], opening_length));

        let mut truncated = 0usize;
        for i in 2..turns.len() {
            let fitted = fit_context(&turns[..i], self.max_tokens, counter)?;
            if fitted.dropped > 0 {
                truncated += 1;
            }
            records.push(self.record(fitted.text, &turns[i], fitted.length));
        }

        debug!(
            turns = turns.len(),
            records = records.len(),
            truncated,
            max_tokens = self.max_tokens,
            "built context windows"
        );
        Ok(records)
    }

    fn record(&self, context: String, response: &Turn, length: usize) -> DialogueRecord {
        DialogueRecord {
            taskname: self.taskname.clone(),
            context,
            response: response.text.clone(),
            context_length: Some(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use playbill_tokens::{TokenError, WhitespaceCounter};
    use proptest::prelude::*;

    fn turns(texts: &[&str]) -> Vec<Turn> {
        texts.iter().map(|t| Turn::new(*t)).collect()
    }

    fn builder(max_tokens: usize) -> ContextWindowBuilder {
        ContextWindowBuilder::new(max_tokens, "eme-seq2seq")
    }

    #[test]
    fn three_turn_example() {
        let scene = turns(&["A: hi\n", "B: hello\n", "A: how are you\n"]);
        let records = builder(1000).build(&scene, &WhitespaceCounter).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].context, "A: hi\n");
        assert_eq!(records[0].response, "B: hello\n");
        assert_eq!(records[0].context_length, Some(2));
        assert_eq!(records[1].context, "A: hi\n B: hello\n");
        assert_eq!(records[1].response, "A: how are you\n");
        assert_eq!(records[1].context_length, Some(4));
        assert!(records.iter().all(|r| r.taskname == "eme-seq2seq"));
    }

    #[test]
    fn truncates_oldest_turns_first() {
        // Each turn is 2 words; budget of 4 keeps the last two turns.
        let scene = turns(&["A: one\n", "B: two\n", "A: three\n", "B: four\n", "A: five\n"]);
        let records = builder(4).build(&scene, &WhitespaceCounter).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[1].context, "A: one\n B: two\n");
        assert_eq!(records[2].context, "B: two\n A: three\n");
        assert_eq!(records[3].context, "A: three\n B: four\n");
        assert_eq!(records[3].response, "A: five\n");
        assert_eq!(records[0].context_length, Some(2));
        assert!(records[1..].iter().all(|r| r.context_length == Some(4)));
    }

    #[test]
    fn single_oversized_turn_is_kept_whole() {
        let scene = turns(&[
            "A: short\n",
            "B: a very long speech that goes on\n",
            "A: reply\n",
        ]);
        let records = builder(3).build(&scene, &WhitespaceCounter).unwrap();

        assert_eq!(records[1].context, "B: a very long speech that goes on\n");
        assert_eq!(records[1].context_length, Some(8));
    }

    #[test]
    fn opening_pair_ignores_budget() {
        let scene = turns(&["A: far too many words here\n", "B: ok\n"]);
        let records = builder(1).build(&scene, &WhitespaceCounter).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context_length, Some(6));
    }

    #[test]
    fn too_few_turns_rejected() {
        let b = builder(10);
        assert_matches!(
            b.build(&[], &WhitespaceCounter),
            Err(WindowError::TooFewTurns { found: 0 })
        );
        assert_matches!(
            b.build(&turns(&["A: alone\n"]), &WhitespaceCounter),
            Err(WindowError::TooFewTurns { found: 1 })
        );
    }

    #[test]
    fn zero_budget_rejected() {
        let scene = turns(&["A\n", "B\n"]);
        assert_matches!(
            builder(0).build(&scene, &WhitespaceCounter),
            Err(WindowError::ZeroBudget)
        );
    }

    #[test]
    fn counter_errors_propagate() {
        struct Failing;
        impl TokenCounter for Failing {
            fn count(&self, _text: &str) -> playbill_tokens::Result<usize> {
                Err(TokenError::Encode("boom".into()))
            }
        }
        let scene = turns(&["A\n", "B\n"]);
        assert_matches!(
            builder(10).build(&scene, &Failing),
            Err(WindowError::Token(TokenError::Encode(_)))
        );
    }

    #[test]
    fn fit_context_reports_dropped() {
        let history = turns(&["a b c\n", "d e\n", "f\n"]);
        let fitted = fit_context(&history, 3, &WhitespaceCounter).unwrap();
        assert_eq!(fitted.text, "d e\n f\n");
        assert_eq!(fitted.length, 3);
        assert_eq!(fitted.dropped, 1);

        let untouched = fit_context(&history, 100, &WhitespaceCounter).unwrap();
        assert_eq!(untouched.dropped, 0);
        assert_eq!(untouched.length, 6);
    }

    #[test]
    fn works_with_trait_objects_and_closures() {
        let scene = turns(&["abc", "de", "f"]);
        let chars = |t: &str| t.len();
        let dynamic: &dyn TokenCounter = &chars;
        let records = builder(4).build(&scene, dynamic).unwrap();
        // "abc de" is 6 chars, so the context falls back to "de".
        assert_eq!(records[1].context, "de");
        assert_eq!(records[1].context_length, Some(2));
    }

    fn scene_strategy() -> impl Strategy<Value = Vec<Turn>> {
        proptest::collection::vec("[A-Z]{1,6}: [a-z]{1,6}( [a-z]{1,6}){0,8}\n", 2..25)
            .prop_map(|texts| texts.into_iter().map(Turn::new).collect())
    }

    proptest! {
        #[test]
        fn one_record_per_turn_after_the_first(scene in scene_strategy(), max in 1usize..40) {
            let records = builder(max).build(&scene, &WhitespaceCounter).unwrap();
            prop_assert_eq!(records.len(), scene.len() - 1);
            for (record, turn) in records.iter().zip(&scene[1..]) {
                prop_assert_eq!(&record.response, &turn.text);
            }
        }

        #[test]
        fn within_budget_or_single_preceding_turn(scene in scene_strategy(), max in 1usize..40) {
            let records = builder(max).build(&scene, &WhitespaceCounter).unwrap();
            for (i, record) in records.iter().enumerate().skip(1) {
                let length = record.context_length.unwrap();
                let preceding = &scene[i].text;
                prop_assert!(length <= max || &record.context == preceding);
            }
        }

        #[test]
        fn contexts_are_suffixes_of_history(scene in scene_strategy(), max in 1usize..40) {
            let records = builder(max).build(&scene, &WhitespaceCounter).unwrap();
            for (i, record) in records.iter().enumerate().skip(1) {
                let full = join_turns(&scene[..=i]);
                prop_assert!(full.ends_with(&record.context));
            }
        }

        #[test]
        fn truncation_is_monotonic(history in scene_strategy()) {
            let counter = WhitespaceCounter;
            let lengths: Vec<usize> = (0..history.len())
                .map(|start| counter.count(&join_turns(&history[start..])).unwrap())
                .collect();
            prop_assert!(lengths.windows(2).all(|w| w[0] >= w[1]));

            let full = lengths[0];
            for max in [1, full / 2, full] {
                let fitted = fit_context(&history, max.max(1), &counter).unwrap();
                prop_assert!(fitted.length <= full);
                prop_assert_eq!(fitted.length, lengths[fitted.dropped]);
            }
        }
    }
}
