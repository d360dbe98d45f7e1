use thiserror::Error;

/// Errors surfaced by the translation pool and its file streaming front.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was malformed and rejected before any worker was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The inference engine failed while decoding a sub-batch. The enclosing
    /// request is aborted; other in-flight requests are unaffected.
    #[error("engine fault: {0}")]
    EngineFault(String),

    /// A read or write failure during file streaming. Output already flushed
    /// before the fault point stays on disk.
    #[error("i/o fault: {0}")]
    Io(#[from] std::io::Error),

    /// The pool shut down (or a worker died) before the request resolved.
    #[error("translator pool is closed")]
    PoolClosed,
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;
