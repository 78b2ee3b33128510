// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Queue-backed collection of results from concurrent check tasks.
//!
//! The report builder is single-writer by design, while checks run
//! wherever the scanner puts them: spawned tasks, pools, one task per
//! node. This module bridges the two with the usual actor shape. A
//! dedicated writer task owns the [`RunBuilder`] and drains a bounded
//! command queue; [`RunCollector`] and [`CheckSink`] are cheap
//! cloneable handles that submit commands and await the outcome, so
//! every caller still observes builder errors synchronously.

use chrono::Utc;
use clusterscan_report::{CheckId, Payload, ReportError, RunBuilder, RunReport, Status};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Commands the writer task can hold before producers start waiting.
const COMMAND_QUEUE_DEPTH: usize = 256;

/// Errors surfaced when collecting results.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The writer task is gone, typically because the collector was
    /// dropped before this handle was used.
    #[error("collector is closed")]
    Closed,

    /// The report builder rejected the operation.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectError>;

enum Command {
    OpenCheck {
        name: String,
        kind: String,
        reply: oneshot::Sender<clusterscan_report::Result<CheckId>>,
    },
    Record {
        check: CheckId,
        object_id: String,
        status: Status,
        payload: Option<Payload>,
        reply: oneshot::Sender<clusterscan_report::Result<()>>,
    },
    Finish {
        reply: oneshot::Sender<clusterscan_report::Result<RunReport>>,
    },
}

/// Owns one run and serializes all writes to it.
///
/// Creating a collector spawns the writer task and stamps the run's
/// start time. The task exits once the collector and every
/// [`CheckSink`] cloned from it have been dropped.
pub struct RunCollector {
    tx: mpsc::Sender<Command>,
}

impl RunCollector {
    /// Opens a run and spawns its writer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        version: impl Into<String>,
        run_id: impl Into<String>,
        description: impl Into<String>,
    ) -> RunCollector {
        let mut builder = RunBuilder::new(version, run_id, description);
        builder
            .set_created_at(Utc::now())
            .expect("a new builder is not finalized");

        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        tokio::spawn(write_loop(builder, rx));
        RunCollector { tx }
    }

    /// Appends a check to the run and returns a sink for its results.
    pub async fn open_check(
        &self,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<CheckSink> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::OpenCheck {
                name: name.into(),
                kind: kind.into(),
                reply,
            })
            .await
            .map_err(|_| CollectError::Closed)?;
        let check = response.await.map_err(|_| CollectError::Closed)??;
        Ok(CheckSink {
            tx: self.tx.clone(),
            check,
        })
    }

    /// Finalizes the run and returns the finished report.
    ///
    /// Sinks that are still alive afterwards get
    /// [`ReportError::AlreadyFinalized`] on every subsequent record.
    pub async fn finish(self) -> Result<RunReport> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Finish { reply })
            .await
            .map_err(|_| CollectError::Closed)?;
        let report = response.await.map_err(|_| CollectError::Closed)??;
        Ok(report)
    }
}

/// Records object results under one check of one run.
///
/// Sinks are cloneable and can be handed to as many concurrent tasks
/// as the run needs; the writer task serializes the appends.
#[derive(Clone)]
pub struct CheckSink {
    tx: mpsc::Sender<Command>,
    check: CheckId,
}

impl CheckSink {
    /// Records one object's outcome, waiting until the writer task has
    /// accepted or rejected it.
    pub async fn record(
        &self,
        object_id: impl Into<String>,
        status: Status,
        payload: Option<Payload>,
    ) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Record {
                check: self.check,
                object_id: object_id.into(),
                status,
                payload,
                reply,
            })
            .await
            .map_err(|_| CollectError::Closed)?;
        response.await.map_err(|_| CollectError::Closed)??;
        Ok(())
    }
}

async fn write_loop(mut builder: RunBuilder, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        // Reply receivers may have been dropped by cancelled callers;
        // the send results are intentionally discarded.
        match command {
            Command::OpenCheck { name, kind, reply } => {
                debug!(check = %name, kind = %kind, "Opening check");
                let _ = reply.send(builder.add_check(name, kind));
            }
            Command::Record {
                check,
                object_id,
                status,
                payload,
                reply,
            } => {
                debug!(object = %object_id, status = %status, "Recording object result");
                let _ = reply.send(builder.add_object_result(check, object_id, status, payload));
            }
            Command::Finish { reply } => {
                let result = builder.finalize();
                if let Ok(report) = &result {
                    info!(
                        run_id = %report.run_id,
                        checks = report.checks.len(),
                        status = %report.roll_up(),
                        "Run finalized"
                    );
                }
                let _ = reply.send(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterscan_report::NcclResult;

    #[tokio::test]
    async fn test_collects_results_through_the_writer_task() {
        let collector = RunCollector::new("1.4.0", "run-1", "smoke");
        let sink = collector.open_check("nccl-bandwidth", "network").await.unwrap();

        sink.record(
            "node-1",
            Status::Pass,
            Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
        )
        .await
        .unwrap();
        sink.record("node-2", Status::Fail, None).await.unwrap();

        let report = collector.finish().await.unwrap();
        assert_eq!(report.run_id, "run-1");
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].object_results.len(), 2);
        assert_eq!(report.roll_up(), Status::Fail);
        assert!(report.created_at().is_some());
    }

    #[tokio::test]
    async fn test_sinks_error_once_the_run_is_finished() {
        let collector = RunCollector::new("1.4.0", "run-2", "");
        let sink = collector.open_check("gpu-count", "hardware").await.unwrap();
        sink.record("node-1", Status::Pass, None).await.unwrap();

        collector.finish().await.unwrap();

        let err = sink.record("node-2", Status::Pass, None).await.unwrap_err();
        assert!(matches!(
            err,
            CollectError::Report(ReportError::AlreadyFinalized)
        ));
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_reported_to_the_caller() {
        let collector = RunCollector::new("1.4.0", "run-3", "");
        let sink = collector.open_check("nccl-bandwidth", "network").await.unwrap();

        let err = sink
            .record(
                "node-1",
                Status::Fail,
                Some(Payload::Nccl(NcclResult { bandwidth_gbps: -1 })),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CollectError::Report(ReportError::InvalidPayload { .. })
        ));

        // The rejected record left no trace in the report.
        let report = collector.finish().await.unwrap();
        assert!(report.checks[0].object_results.is_empty());
    }
}
