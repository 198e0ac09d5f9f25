//! Per-step diagnostics of an agent.
//!
//! A [`Record`] is a small key-value container filled by an environment at
//! every step, e.g. the nectar obtained so far or the distance to the current
//! target flower. Records are handed to a [`Recorder`], which decides where
//! they go.
//!
//! ```rust
//! use hummingbird_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward", RecordValue::Scalar(0.07));
//! record.insert("obs", RecordValue::Array1(vec![0.0; 10]));
//! assert_eq!(record.get_scalar("reward").unwrap(), 0.07);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
