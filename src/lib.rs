//! VstAudit Core Library
//!
//! Scans directory trees of Ableton Live project files (`.als`) and reports
//! which VST plugins they use, attributed to a manufacturer where the
//! heuristics allow it.
//!
//! # Architecture
//!
//! The crate is the scanning core only. Presentation shells (the bundled
//! CLI, or an external GUI) sit on top of the library API and the progress
//! channel; the core itself never touches a terminal or a widget.
//!
//! # Pipeline
//!
//! ## Discovery (`discover` module)
//! - `find_project_files()` - recursive, failure-tolerant `.als` walk
//!
//! ## Parsing (`parse` module)
//! - `parse_project_file()` - gzip + XML walk yielding the deduplicated
//!   plugin references of one project and its manufacturer evidence
//!
//! ## Manufacturer inference (`resolve` module)
//! - `manufacturer_from_path()` - vendor folder extraction with a stoplist
//! - `manufacturer_from_name()` - known vendor-substring table
//!
//! ## Aggregation (`session` module)
//! - `AuditSession` - usage counter, manufacturer mapping and project
//!   registry for one scan; `scan_directory()` drives the whole pipeline
//!
//! ## Reporting (`report` module)
//! - `render_report()` / `write_report()` - the five-section text report
//! - `render_summary()` - short console summary
//!
//! ## Progress (`progress` module)
//! - `channel()` / `spawn_scan()` - one-way milestone messages for a
//!   foreground loop while a worker runs the scan

pub mod discover;
pub mod parse;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod session;

pub use progress::{channel as progress_channel, ProgressReceiver, ProgressSender};
pub use report::{render_report, render_summary, write_report};
pub use session::{AuditSession, PluginUsage};
