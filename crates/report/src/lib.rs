//! Result model for cluster health-check runs.
//!
//! A scan of a GPU cluster produces one [`RunReport`]: the run's
//! metadata plus one [`CheckResult`] per health check, each holding an
//! [`ObjectResult`] per checked object (typically a node). Results are
//! appended through [`RunBuilder`] while the run executes and the
//! report is serialized with [`RunReport::to_bytes`] once finalized.
//!
//! This crate is a pure data model: it performs no I/O, spawns
//! nothing, and never logs. Collection plumbing lives in
//! `clusterscan-collector`.
//!
//! # Quick Start
//!
//! ```
//! use clusterscan_report::{NcclResult, Payload, RunBuilder, RunReport, RunSummary, Status};
//!
//! # fn main() -> clusterscan_report::Result<()> {
//! let mut run = RunBuilder::new("1.4.0", "run-42", "nightly bandwidth sweep");
//! run.set_created_at(chrono::Utc::now())?;
//!
//! let bandwidth = run.add_check("nccl-bandwidth", "network")?;
//! run.add_object_result(
//!     bandwidth,
//!     "node-1",
//!     Status::Pass,
//!     Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
//! )?;
//! run.add_object_result(
//!     bandwidth,
//!     "node-2",
//!     Status::Fail,
//!     Some(Payload::Nccl(NcclResult { bandwidth_gbps: 17 })),
//! )?;
//!
//! let report = run.finalize()?;
//! assert_eq!(report.roll_up(), Status::Fail);
//!
//! let bytes = report.to_bytes();
//! assert_eq!(RunReport::from_bytes(&bytes)?, report);
//!
//! println!("{}", RunSummary::of(&report));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`report`] - Wire messages with their pinned field numbers
//! - [`status`] - Status values and severity roll-up
//! - [`builder`] - Append-only run construction
//! - [`summary`] - Consumer-side roll-ups and rendering
//! - [`error`] - Error types

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod builder;
pub mod error;
pub mod report;
pub mod status;
pub mod summary;

pub use builder::{CheckId, RunBuilder};
pub use error::{ReportError, Result};
pub use report::{CheckResult, NcclResult, ObjectResult, Payload, RunReport, Timestamp};
pub use status::{roll_up, Status};
pub use summary::{CheckSummary, RunSummary, StatusCounts};
