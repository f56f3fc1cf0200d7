//! Output module for the shared result artifact
//!
//! This module owns the on-disk representation of batch results:
//! - Record formatting (one tab-separated line per URL)
//! - The result sink serializing concurrent appends through one writer

mod record;
mod sink;

pub use record::{Payload, ResultRecord, HEADER};
pub use sink::{ResultSink, SinkError};
