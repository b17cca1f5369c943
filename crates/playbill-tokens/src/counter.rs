//! The [`TokenCounter`] trait and the tokenizer-free counters.

use crate::errors::Result;

/// Counts tokens in a text.
///
/// Implementations must be deterministic: the window builder relies on the
/// same text always producing the same count.
pub trait TokenCounter {
    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> Result<usize>;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize,
{
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self(text))
    }
}

/// Counts whitespace-delimited words.
///
/// Useful for dry runs and tests where a real vocabulary is not needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn whitespace_counts_words() {
        let counter = WhitespaceCounter;
        assert_eq!(counter.count("A: hi\n").unwrap(), 2);
        assert_eq!(counter.count("A: hi\n B: hello\n").unwrap(), 4);
        assert_eq!(counter.count("").unwrap(), 0);
        assert_eq!(counter.count("  \n\t ").unwrap(), 0);
    }

    #[test]
    fn closures_are_counters() {
        let chars = |text: &str| text.chars().count();
        assert_eq!(chars.count("abc").unwrap(), 3);
    }

    #[test]
    fn usable_as_trait_object() {
        let counters: Vec<Box<dyn TokenCounter>> =
            vec![Box::new(WhitespaceCounter), Box::new(|t: &str| t.len())];
        let counts: Vec<usize> = counters
            .iter()
            .map(|c| c.count("to be").unwrap())
            .collect();
        assert_eq!(counts, vec![2, 5]);
    }

    proptest! {
        #[test]
        fn whitespace_count_is_additive_over_separator(
            a in "[a-z ]{0,20}",
            b in "[a-z ]{0,20}",
        ) {
            let counter = WhitespaceCounter;
            let joined = format!("{a} {b}");
            prop_assert_eq!(
                counter.count(&joined).unwrap(),
                counter.count(&a).unwrap() + counter.count(&b).unwrap()
            );
        }
    }
}
