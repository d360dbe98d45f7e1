//! # Inference Engine Seam
//!
//! The pool is decoupled from whatever numeric backend performs the actual
//! neural computation. Anything that can decode a sub-batch of token
//! sequences into ranked hypotheses can sit behind the pool by implementing
//! [`TranslationEngine`]; the test suite substitutes a canned engine without
//! standing up real model weights.
//!
//! Device and compute-type selection are configuration the pool carries but
//! never interprets: they are handed verbatim to whatever loads the engine.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::batch::Sequence;
use crate::error::{Error, Result};
use crate::options::TranslationOptions;
use crate::result::TranslationResult;

#[cfg(test)]
pub(crate) mod mock;

/// File expected inside a model directory. [`contains_model`] probes for it.
pub const MODEL_FILENAME: &str = "model.bin";

/// The opaque decoding capability consumed by each worker.
///
/// One engine instance is owned by exactly one worker and is never called
/// concurrently; parallelism comes from the number of workers. A call may
/// block for arbitrarily long and may use additional internal compute
/// threads.
///
/// # Contract
///
/// * The returned list has exactly one [`TranslationResult`] per source
///   sequence, in source order.
/// * `target_prefixes` is either empty (no constraint) or aligned one-to-one
///   with `source`; an empty prefix sequence constrains nothing.
/// * `beam_size == 1` selects greedy decoding and clamps `num_hypotheses`
///   to 1; otherwise engines may clamp `num_hypotheses` to `beam_size`.
/// * Decoding halts at `max_decoding_length` or an end marker, never before
///   `min_decoding_length` tokens are produced.
/// * A fault is reported through [`Error::EngineFault`] and propagates
///   verbatim; the pool performs no local retry.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    async fn translate(
        &self,
        source: &[Sequence],
        target_prefixes: &[Sequence],
        options: Arc<TranslationOptions>,
    ) -> Result<Vec<TranslationResult>>;
}

/// Compute device an engine is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda { index: usize },
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda { index } => write!(f, "cuda:{index}"),
        }
    }
}

impl FromStr for Device {
    type Err = Error;

    /// Parses `"cpu"`, `"cuda"` (index 0), or `"cuda:<index>"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda { index: 0 }),
            other => match other.strip_prefix("cuda:") {
                Some(index) => index
                    .parse()
                    .map(|index| Device::Cuda { index })
                    .map_err(|_| {
                        Error::InvalidArgument(format!("invalid device index in {other:?}"))
                    }),
                None => Err(Error::InvalidArgument(format!("unknown device {other:?}"))),
            },
        }
    }
}

/// Numeric precision the engine should compute with. `Default` defers to
/// whatever the model was saved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeType {
    #[default]
    Default,
    Float32,
    Float16,
    Int16,
    Int8,
}

impl fmt::Display for ComputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComputeType::Default => "default",
            ComputeType::Float32 => "float32",
            ComputeType::Float16 => "float16",
            ComputeType::Int16 => "int16",
            ComputeType::Int8 => "int8",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ComputeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(ComputeType::Default),
            "float32" | "float" => Ok(ComputeType::Float32),
            "float16" => Ok(ComputeType::Float16),
            "int16" => Ok(ComputeType::Int16),
            "int8" => Ok(ComputeType::Int8),
            other => Err(Error::InvalidArgument(format!(
                "unknown compute type {other:?}"
            ))),
        }
    }
}

/// Bring-up parameters handed to the engine loader, once per worker slot.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model_path: std::path::PathBuf,
    pub device: Device,
    pub compute_type: ComputeType,
    /// Bound on the internal compute threads one engine call may use.
    pub intra_threads: usize,
}

/// Loads one engine instance per worker slot.
///
/// The loader is invoked `inter_threads` times at pool bring-up; each handle
/// it produces is owned exclusively by one worker for the pool's lifetime.
#[async_trait]
pub trait EngineLoader {
    type Engine: TranslationEngine + 'static;

    async fn load(&self, config: &EngineConfig, slot: usize) -> Result<Self::Engine>;
}

/// Pure probe: does `path` look like a model directory? No pool state is
/// involved.
pub fn contains_model(path: impl AsRef<Path>) -> bool {
    path.as_ref().join(MODEL_FILENAME).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_defaults_to_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
        assert_eq!(ComputeType::default(), ComputeType::Default);
    }

    #[test]
    fn test_device_parsing() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("cuda".parse::<Device>().unwrap(), Device::Cuda { index: 0 });
        assert_eq!(
            "cuda:3".parse::<Device>().unwrap(),
            Device::Cuda { index: 3 }
        );
        assert!("gpu".parse::<Device>().is_err());
        assert!("cuda:x".parse::<Device>().is_err());
    }

    #[test]
    fn test_device_round_trips_through_display() {
        for device in [Device::Cpu, Device::Cuda { index: 2 }] {
            assert_eq!(device.to_string().parse::<Device>().unwrap(), device);
        }
    }

    #[test]
    fn test_compute_type_parsing() {
        assert_eq!(
            "default".parse::<ComputeType>().unwrap(),
            ComputeType::Default
        );
        assert_eq!("float".parse::<ComputeType>().unwrap(), ComputeType::Float32);
        assert_eq!("int8".parse::<ComputeType>().unwrap(), ComputeType::Int8);
        assert!("bfloat16".parse::<ComputeType>().is_err());
    }

    #[test]
    fn test_contains_model_probe() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(!contains_model(dir.path()), "empty directory has no model");

        std::fs::write(dir.path().join(MODEL_FILENAME), b"").expect("touch model file");
        assert!(contains_model(dir.path()));

        assert!(!contains_model(dir.path().join("missing")));
    }
}
