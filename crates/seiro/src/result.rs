use crate::batch::Sequence;

/// One ranked candidate translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    /// Output tokens, in order.
    pub tokens: Sequence,

    /// Scalar score assigned by the engine; higher is better.
    pub score: f32,

    /// Optional attention matrix: one row per output token, each row a weight
    /// over the source tokens. Present only when the request asked for it and
    /// the engine supports it.
    pub attention: Option<Vec<Vec<f32>>>,
}

impl Hypothesis {
    pub fn new(tokens: Sequence, score: f32) -> Self {
        Self {
            tokens,
            score,
            attention: None,
        }
    }

    pub fn with_attention(tokens: Sequence, score: f32, attention: Vec<Vec<f32>>) -> Self {
        Self {
            tokens,
            score,
            attention: Some(attention),
        }
    }
}

/// The translation produced for one input sequence: between 1 and
/// `num_hypotheses` candidates, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    hypotheses: Vec<Hypothesis>,
}

impl TranslationResult {
    pub fn new(hypotheses: Vec<Hypothesis>) -> Self {
        Self { hypotheses }
    }

    /// The ranked candidates, best first.
    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn num_hypotheses(&self) -> usize {
        self.hypotheses.len()
    }

    /// The top-ranked hypothesis, or `None` if the engine returned an empty
    /// candidate list (a contract violation callers may want to surface).
    pub fn best(&self) -> Option<&Hypothesis> {
        self.hypotheses.first()
    }

    pub fn has_attention(&self) -> bool {
        self.hypotheses.iter().any(|h| h.attention.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Sequence {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_best_is_first_hypothesis() {
        let result = TranslationResult::new(vec![
            Hypothesis::new(tokens(&["guten", "tag"]), -0.1),
            Hypothesis::new(tokens(&["hallo"]), -0.7),
        ]);
        assert_eq!(result.num_hypotheses(), 2);
        let best = result.best().expect("non-empty result");
        assert_eq!(best.tokens, tokens(&["guten", "tag"]));
    }

    #[test]
    fn test_empty_result_has_no_best() {
        let result = TranslationResult::new(vec![]);
        assert!(result.best().is_none());
        assert_eq!(result.num_hypotheses(), 0);
    }

    #[test]
    fn test_has_attention() {
        let plain = TranslationResult::new(vec![Hypothesis::new(tokens(&["a"]), 0.0)]);
        assert!(!plain.has_attention());

        let attended = TranslationResult::new(vec![Hypothesis::with_attention(
            tokens(&["a"]),
            0.0,
            vec![vec![1.0]],
        )]);
        assert!(attended.has_attention());
    }
}
