//! # Seiro
//!
//! A batched inference-serving core for sequence-to-sequence translation:
//! stacked trays of sentences, steamed together.
//!
//! ## Overview
//!
//! This library schedules collections of tokenized source sequences across a
//! fixed pool of model-executing workers, applies a configurable decoding
//! strategy (greedy, beam search, or sampling), and returns ranked hypotheses
//! with optional per-token scores and attention maps. A streaming
//! file-to-file mode translates arbitrarily large inputs under bounded
//! memory while preserving input ordering.
//!
//! Key components include:
//!
//! - A translator pool that splits batches, dispatches sub-batches, and
//!   reassembles results in request order
//! - An opaque inference-engine seam so any decoding backend can be plugged
//!   in (or mocked out in tests)
//! - An immutable decoding-options contract carried with every request
//! - An ordered, back-pressured file streaming consumer
//!
//! ## Architecture
//!
//! The pool owns `inter_threads` workers, each bound to exactly one
//! [`engine::TranslationEngine`] instance. A submitted batch is carved into
//! contiguous sub-batches of at most `max_batch_size` sequences; workers pull
//! sub-batches from a shared queue and may finish in any order, but every
//! sub-batch carries its offset into the parent batch and results are merged
//! back by that offset. Callers therefore always see output order equal to
//! input order, for any number of workers.
//!
//! The actual neural forward pass, vocabulary handling, and model loading
//! live behind the engine seam and are not part of this crate.
//!
//! ## Example
//!
//! ```ignore
//! use seiro::{TranslatorBuilder, TranslationOptions};
//!
//! # async fn example(loader: impl seiro::engine::EngineLoader) -> seiro::Result<()> {
//! let translator = TranslatorBuilder::new("/path/to/model")
//!     .inter_threads(4)
//!     .build(loader)
//!     .await?;
//!
//! let source = vec![vec!["hello".to_string(), "world".to_string()]];
//! let results = translator
//!     .translate_batch(source, None, TranslationOptions::default())
//!     .await?;
//! println!("{:?}", results[0].best());
//! # Ok(())
//! # }
//! ```

mod batch;
mod error;
mod options;
mod result;
mod stream;
mod translator;

pub mod engine;
pub mod pool;

pub use batch::{Batch, Sequence};
pub use engine::contains_model;
pub use error::{Error, Result};
pub use options::TranslationOptions;
pub use pool::{PoolConfig, TranslationHandle, TranslatorPool};
pub use result::{Hypothesis, TranslationResult};
pub use translator::{Translator, TranslatorBuilder};
