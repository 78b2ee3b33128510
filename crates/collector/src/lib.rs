//! Concurrent collection of health-check results.
//!
//! `clusterscan-report` models a finished run; this crate feeds one
//! while the run is still executing. A spawned writer task owns the
//! report builder, and cloneable handles let any number of concurrent
//! check tasks append object results without sharing mutable state.
//!
//! # Quick Start
//!
//! ```
//! use clusterscan_collector::{new_run_id, RunCollector};
//! use clusterscan_report::{NcclResult, Payload, Status};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> clusterscan_collector::Result<()> {
//! let collector = RunCollector::new("1.4.0", new_run_id(), "nightly sweep");
//!
//! let bandwidth = collector.open_check("nccl-bandwidth", "network").await?;
//! bandwidth
//!     .record(
//!         "node-1",
//!         Status::Pass,
//!         Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
//!     )
//!     .await?;
//!
//! let report = collector.finish().await?;
//! assert_eq!(report.checks.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod collector;

pub use collector::{CheckSink, CollectError, Result, RunCollector};

use uuid::Uuid;

/// Generates a fresh run identifier.
///
/// Run ids are random v4 UUIDs rendered as strings. Producers that
/// need a different correlation scheme can pass their own id to
/// [`RunCollector::new`] instead.
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
