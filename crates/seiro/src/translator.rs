use std::path::{Path, PathBuf};

use tracing::info;

use crate::batch::{Batch, Sequence};
use crate::engine::{ComputeType, Device, EngineConfig, EngineLoader, contains_model};
use crate::error::{Error, Result};
use crate::options::TranslationOptions;
use crate::pool::{PoolConfig, TranslatorPool};
use crate::result::TranslationResult;

/// Configures and brings up a [`Translator`].
///
/// Defaults mirror a single-device setup: CPU, model-native compute type,
/// one worker, four internal compute threads per engine call.
pub struct TranslatorBuilder {
    model_path: PathBuf,
    device: Device,
    compute_type: ComputeType,
    inter_threads: usize,
    intra_threads: usize,
    pool_config: PoolConfig,
}

impl TranslatorBuilder {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            device: Device::Cpu,
            compute_type: ComputeType::Default,
            inter_threads: 1,
            intra_threads: 4,
            pool_config: PoolConfig::default(),
        }
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn compute_type(mut self, compute_type: ComputeType) -> Self {
        self.compute_type = compute_type;
        self
    }

    /// Number of independent workers, each bound to its own engine instance.
    pub fn inter_threads(mut self, inter_threads: usize) -> Self {
        self.inter_threads = inter_threads;
        self
    }

    /// Bound on the internal compute threads one engine call may use.
    pub fn intra_threads(mut self, intra_threads: usize) -> Self {
        self.intra_threads = intra_threads;
        self
    }

    /// Sub-batch cap applied when a request leaves `max_batch_size` at 0.
    pub fn default_max_batch_size(mut self, default_max_batch_size: usize) -> Self {
        self.pool_config.default_max_batch_size = default_max_batch_size;
        self
    }

    /// Read-ahead depth for file streaming. 0 selects `workers + 1`.
    pub fn max_queued_batches(mut self, max_queued_batches: usize) -> Self {
        self.pool_config.max_queued_batches = max_queued_batches;
        self
    }

    /// Loads one engine per worker slot through `loader` and starts the pool.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build<L: EngineLoader>(self, loader: L) -> Result<Translator> {
        if self.inter_threads == 0 {
            return Err(Error::InvalidArgument(
                "inter_threads must be at least 1".to_string(),
            ));
        }
        if !contains_model(&self.model_path) {
            return Err(Error::InvalidArgument(format!(
                "no model found at {}",
                self.model_path.display()
            )));
        }

        let config = EngineConfig {
            model_path: self.model_path,
            device: self.device,
            compute_type: self.compute_type,
            intra_threads: self.intra_threads,
        };

        let mut engines = Vec::with_capacity(self.inter_threads);
        for slot in 0..self.inter_threads {
            engines.push(loader.load(&config, slot).await?);
        }

        info!(
            model = %config.model_path.display(),
            device = %config.device,
            compute_type = %config.compute_type,
            inter_threads = self.inter_threads,
            intra_threads = config.intra_threads,
            "translator ready"
        );

        Ok(Translator {
            pool: TranslatorPool::new(engines, self.pool_config),
        })
    }
}

/// # Translator
///
/// The outward-facing surface over a [`TranslatorPool`]: whole-batch
/// translation and file-to-file streaming, with the same ordering guarantees
/// the pool provides.
pub struct Translator {
    pool: TranslatorPool,
}

impl Translator {
    /// Translates a batch of tokenized sequences, optionally constrained by
    /// target prefixes, returning one ordered result per input sequence.
    ///
    /// An empty or absent source yields an empty result list; a prefix list
    /// whose length differs from the source fails with
    /// [`Error::InvalidArgument`] before any worker is touched.
    pub async fn translate_batch(
        &self,
        source: Vec<Sequence>,
        target_prefix: Option<Vec<Sequence>>,
        options: TranslationOptions,
    ) -> Result<Vec<TranslationResult>> {
        let batch = match target_prefix {
            Some(prefixes) => Batch::with_target_prefixes(source, prefixes),
            None => Batch::new(source),
        };
        self.pool.translate_batch(batch, options).await
    }

    /// Streams `input_path` to `output_path` line by line; see
    /// [`TranslatorPool::consume_text_file`]. Returns the total number of
    /// source tokens processed.
    pub async fn translate_file(
        &self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        read_batch_size: usize,
        options: &TranslationOptions,
        with_scores: bool,
    ) -> Result<u64> {
        self.pool
            .consume_text_file(input_path, output_path, read_batch_size, options, with_scores)
            .await
    }

    /// Access to the underlying pool, for callers that want pending handles
    /// via [`TranslatorPool::post`].
    pub fn pool(&self) -> &TranslatorPool {
        &self.pool
    }
}
