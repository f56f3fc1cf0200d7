//! Result sink - serialized appends to the shared output file
//!
//! Concurrent tasks must never interleave partial lines or lose records, so
//! all writes go through one owned writer: the sink opens the file once,
//! writes the fixed header, then spawns a single task that receives records
//! over a channel and appends them. Senders hold cheap channel handles; the
//! file handle itself is never shared.
//!
//! Sink failures are fatal for the batch. Once the writer cannot append
//! (disk full, permission lost), completeness can no longer be guaranteed
//! and the error is surfaced from [`ResultSink::close`].

use crate::output::record::{ResultRecord, HEADER};
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Backpressure bound for the record channel; tasks briefly park if the
/// writer falls behind, they are never dropped.
const CHANNEL_CAPACITY: usize = 64;

/// Errors from the output sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Result writer stopped before the batch completed")]
    Closed,
}

/// The shared append-only destination for a batch
///
/// Created before any task starts; the header line is written immediately
/// and the file is only ever appended to afterwards.
pub struct ResultSink {
    tx: mpsc::Sender<ResultRecord>,
    writer: JoinHandle<Result<u64, SinkError>>,
}

impl ResultSink {
    /// Creates the output file, writes the header, and starts the writer
    pub async fn open(path: &Path) -> Result<Self, SinkError> {
        let mut file = File::create(path).await?;
        file.write_all(HEADER.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let writer = tokio::spawn(write_loop(file, rx));

        Ok(Self { tx, writer })
    }

    /// Returns a sender handle for one task
    ///
    /// Each completed task submits exactly one record through its handle.
    /// Submission fails only if the writer has died, which [`close`] reports
    /// as the underlying I/O error.
    ///
    /// [`close`]: ResultSink::close
    pub fn sender(&self) -> mpsc::Sender<ResultRecord> {
        self.tx.clone()
    }

    /// Waits for every queued record to be appended and returns the count
    pub async fn close(self) -> Result<u64, SinkError> {
        // Dropping our sender lets the writer drain and exit once every
        // task sender is gone too.
        drop(self.tx);
        match self.writer.await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Closed),
        }
    }
}

/// The single owned writer: drains the channel, appending one line per record
async fn write_loop(
    mut file: File,
    mut rx: mpsc::Receiver<ResultRecord>,
) -> Result<u64, SinkError> {
    let mut written = 0u64;
    while let Some(record) = rx.recv().await {
        let mut line = record.to_line();
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        written += 1;
    }
    file.flush().await?;
    Ok(written)
}
