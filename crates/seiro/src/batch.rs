use crate::error::{Error, Result};

/// An ordered list of tokens representing one source or target sentence.
/// The pool never merges, splits, or reorders tokens within a sequence.
pub type Sequence = Vec<String>;

/// An ordered collection of source sequences submitted together, optionally
/// paired one-to-one by index with target-prefix sequences.
///
/// A prefix list, when present, must have the same length as the source list.
/// Individual prefixes may be empty (no constraint for that sequence) but a
/// missing entry is only tolerated through
/// [`with_optional_target_prefixes`](Self::with_optional_target_prefixes)
/// with the `sparse` flag set.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    source: Vec<Sequence>,
    target_prefixes: Option<Vec<Sequence>>,
}

impl Batch {
    pub fn new(source: Vec<Sequence>) -> Self {
        Self {
            source,
            target_prefixes: None,
        }
    }

    pub fn with_target_prefixes(source: Vec<Sequence>, prefixes: Vec<Sequence>) -> Self {
        Self {
            source,
            target_prefixes: Some(prefixes),
        }
    }

    /// Builds a batch from a prefix list that may contain missing entries.
    ///
    /// With `sparse` set, a missing entry is substituted with an empty
    /// sequence; otherwise any `None` is rejected with
    /// [`Error::InvalidArgument`].
    pub fn with_optional_target_prefixes(
        source: Vec<Sequence>,
        prefixes: Vec<Option<Sequence>>,
        sparse: bool,
    ) -> Result<Self> {
        let mut dense = Vec::with_capacity(prefixes.len());
        for (index, prefix) in prefixes.into_iter().enumerate() {
            match prefix {
                Some(prefix) => dense.push(prefix),
                None if sparse => dense.push(Sequence::new()),
                None => {
                    return Err(Error::InvalidArgument(format!(
                        "missing target prefix at index {index}"
                    )));
                }
            }
        }
        Ok(Self::with_target_prefixes(source, dense))
    }

    pub fn source(&self) -> &[Sequence] {
        &self.source
    }

    pub fn target_prefixes(&self) -> Option<&[Sequence]> {
        self.target_prefixes.as_deref()
    }

    /// Number of source sequences in the batch.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Total number of source tokens, used for throughput accounting.
    pub fn token_count(&self) -> u64 {
        self.source.iter().map(|s| s.len() as u64).sum()
    }

    /// Checks the prefix length invariant.
    pub fn validate(&self) -> Result<()> {
        if let Some(prefixes) = &self.target_prefixes {
            if prefixes.len() != self.source.len() {
                return Err(Error::InvalidArgument(format!(
                    "target prefix list has {} entries for {} source sequences",
                    prefixes.len(),
                    self.source.len()
                )));
            }
        }
        Ok(())
    }

    /// Carves the batch into contiguous sub-batches of at most
    /// `max_batch_size` sequences, preserving order and recording each
    /// sub-batch's offset into the original batch. `0` means no cap: the
    /// whole batch becomes a single sub-batch.
    ///
    /// Prefixes, when present, travel with their source slice.
    pub(crate) fn split(self, max_batch_size: usize) -> Vec<SubBatch> {
        let total = self.source.len();
        if total == 0 {
            return vec![];
        }
        let chunk = if max_batch_size == 0 { total } else { max_batch_size };

        let mut prefixes = self.target_prefixes.map(Vec::into_iter);
        let mut source = self.source.into_iter();
        let mut sub_batches = Vec::with_capacity(total.div_ceil(chunk));
        let mut offset = 0;
        while offset < total {
            let take = chunk.min(total - offset);
            let sub_source: Vec<Sequence> = source.by_ref().take(take).collect();
            let sub_prefixes: Vec<Sequence> = match prefixes.as_mut() {
                Some(iter) => iter.by_ref().take(take).collect(),
                None => vec![],
            };
            sub_batches.push(SubBatch {
                offset,
                source: sub_source,
                target_prefixes: sub_prefixes,
            });
            offset += take;
        }
        sub_batches
    }
}

/// A contiguous slice of a batch sized to fit device and memory limits,
/// tagged with its position range in the parent batch. The pool merges
/// results back by this offset, never by completion time.
#[derive(Debug, Clone)]
pub(crate) struct SubBatch {
    pub(crate) offset: usize,
    pub(crate) source: Vec<Sequence>,
    /// Empty when the parent batch carries no prefixes; otherwise aligned
    /// one-to-one with `source`.
    pub(crate) target_prefixes: Vec<Sequence>,
}

impl SubBatch {
    pub(crate) fn len(&self) -> usize {
        self.source.len()
    }
}
