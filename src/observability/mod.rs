//! Structured logging to a rotating file.
//!
//! Every layer of the crate logs through `tracing` macros and spans. This
//! module installs the subscriber that routes them to disk:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFileWriter → marquee.log
//! ```
//!
//! # Features
//!
//! - **File Output**: `<data_dir>/marquee.log`, never stdout
//! - **Automatic Rotation**: Files rotate at 10MB with 3 timestamped backups
//! - **Level Filtering**: `trace_level` config option or `MARQUEE_LOG`
//!
//! # Modules
//!
//! - `init`: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::init_tracing;
