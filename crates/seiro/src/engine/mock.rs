//! Canned engine used across the test suite in place of a real model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::batch::Sequence;
use crate::error::{Error, Result};
use crate::options::TranslationOptions;
use crate::result::{Hypothesis, TranslationResult};

use super::{EngineConfig, EngineLoader, TranslationEngine};

/// Token that makes [`CannedEngine`] fault on the sub-batch containing it.
pub(crate) const POISON_TOKEN: &str = "<fault>";

/// A deterministic engine that echoes its input.
///
/// The top hypothesis for a sequence is `prefix ++ source`; alternative
/// hypotheses append an `altN` marker so ranks are distinguishable. Scores
/// decrease with rank. Honors the decoding-length and greedy-clamping
/// contract so boundary tests can assert against it, and sleeps for a
/// configurable duration per call to emulate slow decodes.
pub(crate) struct CannedEngine {
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl CannedEngine {
    pub(crate) fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `translate` invocations on this instance.
    pub(crate) fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn decode_one(
        source: &Sequence,
        prefix: &[String],
        options: &TranslationOptions,
    ) -> TranslationResult {
        let num_hypotheses = if options.beam_size == 1 {
            1
        } else {
            options.num_hypotheses.min(options.beam_size)
        };

        let hypotheses = (0..num_hypotheses)
            .map(|rank| {
                let mut tokens: Sequence = prefix.iter().cloned().chain(source.iter().cloned()).collect();
                if rank > 0 {
                    tokens.push(format!("alt{rank}"));
                }
                while tokens.len() < options.min_decoding_length {
                    tokens.push("<blank>".to_string());
                }
                tokens.truncate(options.max_decoding_length);

                let score = -0.25 * (rank + 1) as f32;
                if options.return_attention {
                    let row = if source.is_empty() {
                        vec![]
                    } else {
                        vec![1.0 / source.len() as f32; source.len()]
                    };
                    Hypothesis::with_attention(tokens.clone(), score, vec![row; tokens.len()])
                } else {
                    Hypothesis::new(tokens, score)
                }
            })
            .collect();

        TranslationResult::new(hypotheses)
    }
}

#[async_trait]
impl TranslationEngine for CannedEngine {
    async fn translate(
        &self,
        source: &[Sequence],
        target_prefixes: &[Sequence],
        options: Arc<TranslationOptions>,
    ) -> Result<Vec<TranslationResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if source.iter().flatten().any(|token| token == POISON_TOKEN) {
            return Err(Error::EngineFault("poisoned sub-batch".to_string()));
        }

        let empty = Sequence::new();
        Ok(source
            .iter()
            .enumerate()
            .map(|(index, sequence)| {
                let prefix = target_prefixes.get(index).unwrap_or(&empty);
                Self::decode_one(sequence, prefix, &options)
            })
            .collect())
    }
}

/// Loader producing one [`CannedEngine`] per slot, optionally with a
/// slot-dependent delay so workers complete out of order.
pub(crate) struct CannedLoader {
    pub(crate) delay_per_slot: Duration,
}

impl CannedLoader {
    pub(crate) fn new() -> Self {
        Self {
            delay_per_slot: Duration::ZERO,
        }
    }
}

#[async_trait]
impl EngineLoader for CannedLoader {
    type Engine = CannedEngine;

    async fn load(&self, _config: &EngineConfig, slot: usize) -> Result<Self::Engine> {
        Ok(CannedEngine::with_delay(self.delay_per_slot * slot as u32))
    }
}
