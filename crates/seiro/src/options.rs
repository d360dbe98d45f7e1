use crate::error::{Error, Result};

/// Decoding configuration carried with every batch request.
///
/// An options value is constructed once per request, validated at submission,
/// and then shared read-only by every worker processing sub-batches of that
/// request. The pool itself never reinterprets any field; it only uses
/// [`max_batch_size`](Self::max_batch_size) to carve sub-batches and hands the
/// rest through to the engine unmodified.
///
/// Defaults mirror a typical translation serving setup: beam search of width
/// 2, a single returned hypothesis, decoding capped at 250 tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Maximum number of sequences per sub-batch. `0` means no explicit cap:
    /// the pool falls back to its configured default.
    pub max_batch_size: usize,

    /// Beam width. `1` selects greedy decoding, in which case engines clamp
    /// `num_hypotheses` to 1.
    pub beam_size: usize,

    /// Number of hypotheses to return per sequence. Engines may clamp this to
    /// `beam_size` when beam search is active.
    pub num_hypotheses: usize,

    /// Length penalty multiplier applied during beam ranking.
    pub length_penalty: f32,

    /// Decoding halts at this many output tokens regardless of end-of-sequence
    /// detection.
    pub max_decoding_length: usize,

    /// Decoding never halts before this many output tokens are produced.
    pub min_decoding_length: usize,

    /// Restrict the output vocabulary to a precomputed mapping.
    pub use_vmap: bool,

    /// Attach an attention matrix to each hypothesis.
    pub return_attention: bool,

    /// Return alternatives at the first unconstrained decoding position.
    pub return_alternatives: bool,

    /// Sample from the top-k candidates. `1` disables sampling in favor of
    /// deterministic search.
    pub sampling_topk: usize,

    /// Softmax temperature used when sampling.
    pub sampling_temperature: f32,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_batch_size: 0,
            beam_size: 2,
            num_hypotheses: 1,
            length_penalty: 0.0,
            max_decoding_length: 250,
            min_decoding_length: 1,
            use_vmap: false,
            return_attention: false,
            return_alternatives: false,
            sampling_topk: 1,
            sampling_temperature: 1.0,
        }
    }
}

impl TranslationOptions {
    /// Checks the field invariants, returning [`Error::InvalidArgument`] on
    /// the first violation. Called by the pool before any dispatch so that a
    /// malformed request never reaches a worker.
    pub fn validate(&self) -> Result<()> {
        if self.beam_size == 0 {
            return Err(Error::InvalidArgument("beam_size must be at least 1".into()));
        }
        if self.num_hypotheses == 0 {
            return Err(Error::InvalidArgument(
                "num_hypotheses must be at least 1".into(),
            ));
        }
        if self.min_decoding_length > self.max_decoding_length {
            return Err(Error::InvalidArgument(format!(
                "min_decoding_length {} exceeds max_decoding_length {}",
                self.min_decoding_length, self.max_decoding_length
            )));
        }
        if self.sampling_topk == 0 {
            return Err(Error::InvalidArgument(
                "sampling_topk must be at least 1".into(),
            ));
        }
        if self.sampling_temperature <= 0.0 {
            return Err(Error::InvalidArgument(
                "sampling_temperature must be positive".into(),
            ));
        }
        Ok(())
    }
}
