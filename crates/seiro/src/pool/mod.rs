//! # Translator Pool
//!
//! The batch scheduling and ordering engine.
//!
//! ## Key Components
//!
//! * [`TranslatorPool`] - Owns the fixed worker set, splits batches into
//!   sub-batches, dispatches them, and merges results back into request order
//! * [`TranslationHandle`] - The pending outcome of one submitted batch
//! * [`PoolConfig`] - Pool-level defaults (sub-batch cap, streaming depth)
//!
//! ## Ordering
//!
//! Workers pull sub-batches from a shared queue and complete in whatever
//! order their engines allow. The pool tags every sub-batch with its offset
//! into the parent batch and merges completed results by that offset, so the
//! result list a caller sees is always in input order.

mod handle;
mod job;
mod translator_pool;
mod worker;

pub use handle::TranslationHandle;
pub use translator_pool::{PoolConfig, TranslatorPool};
