//! # Streaming File Consumer
//!
//! Translates a line-oriented input file to an output file without loading
//! the whole input into memory.
//!
//! Lines are read in windows of `read_batch_size`, posted to the pool, and
//! written back in strict input order: batch *k*'s output is fully flushed
//! before batch *k + 1*'s output begins. Reading ahead overlaps with
//! translation up to a bounded number of in-flight batches, so a slow decode
//! applies backpressure to the reader instead of growing an unbounded queue.

use std::collections::VecDeque;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use crate::batch::{Batch, Sequence};
use crate::error::{Error, Result};
use crate::options::TranslationOptions;
use crate::pool::{TranslationHandle, TranslatorPool};
use crate::result::TranslationResult;

/// Fallback window size when neither the caller nor the options cap batches.
const FALLBACK_READ_BATCH_SIZE: usize = 32;

impl TranslatorPool {
    /// Translates `input_path` to `output_path`, one line per input line, in
    /// input order.
    ///
    /// Each line is whitespace-tokenized into one source sequence. Up to
    /// `read_batch_size` lines form one batch (falling back to the request's
    /// `max_batch_size`, then to a pool default, when zero); the final
    /// partial batch is processed like any other. With `with_scores`, each
    /// output line is `score ||| tokens` for the top hypothesis, otherwise
    /// just the tokens.
    ///
    /// Returns the total number of source tokens read. A fault in any batch
    /// aborts the stream; output flushed before the fault point stays
    /// written.
    pub async fn consume_text_file(
        &self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        read_batch_size: usize,
        options: &TranslationOptions,
        with_scores: bool,
    ) -> Result<u64> {
        let window = if read_batch_size > 0 {
            read_batch_size
        } else if options.max_batch_size > 0 {
            options.max_batch_size
        } else if self.default_max_batch_size() > 0 {
            self.default_max_batch_size()
        } else {
            FALLBACK_READ_BATCH_SIZE
        };
        let depth = self.max_queued_batches();

        let mut lines = BufReader::new(File::open(input_path.as_ref()).await?).lines();
        let mut writer = BufWriter::new(File::create(output_path.as_ref()).await?);

        let mut pending: VecDeque<TranslationHandle> = VecDeque::new();
        let mut token_count: u64 = 0;
        let mut batches_read: u64 = 0;

        loop {
            let mut source: Vec<Sequence> = Vec::with_capacity(window);
            let mut end_of_input = false;
            while source.len() < window {
                match lines.next_line().await? {
                    Some(line) => {
                        let tokens: Sequence =
                            line.split_whitespace().map(str::to_owned).collect();
                        token_count += tokens.len() as u64;
                        source.push(tokens);
                    }
                    None => {
                        end_of_input = true;
                        break;
                    }
                }
            }

            if !source.is_empty() {
                batches_read += 1;
                let handle = self.post(Batch::new(source), options.clone()).await?;
                pending.push_back(handle);
            }

            // Resolve from the front whenever the pipeline is full, and drain
            // everything once the input is exhausted. Popping strictly from
            // the front is what keeps batch outputs from interleaving.
            while pending.len() >= depth || (end_of_input && !pending.is_empty()) {
                if let Some(handle) = pending.pop_front() {
                    let results = handle.await?;
                    write_batch(&mut writer, &results, with_scores).await?;
                    // Flushing per batch keeps completed output on disk even
                    // if a later batch faults.
                    writer.flush().await?;
                }
            }

            if end_of_input {
                break;
            }
        }

        writer.flush().await?;
        debug!(
            batches = batches_read,
            tokens = token_count,
            "file stream complete"
        );
        Ok(token_count)
    }
}

async fn write_batch(
    writer: &mut BufWriter<File>,
    results: &[TranslationResult],
    with_scores: bool,
) -> Result<()> {
    for result in results {
        let best = result.best().ok_or_else(|| {
            Error::EngineFault("engine returned an empty hypothesis list".to_string())
        })?;
        let text = best.tokens.join(" ");
        let line = if with_scores {
            format!("{} ||| {}\n", best.score, text)
        } else {
            format!("{text}\n")
        };
        writer.write_all(line.as_bytes()).await?;
    }
    Ok(())
}
