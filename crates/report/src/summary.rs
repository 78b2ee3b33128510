// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Consumer-side summaries of a report.
//!
//! The wire messages stay faithful to whatever the producer recorded.
//! Summaries are the opinionated read model on top: per-check status
//! counts, severity roll-ups, and a terminal rendering. They also
//! carry serde derives, so an operator-facing surface can emit them as
//! JSON without touching the wire format.

use crate::report::{CheckResult, RunReport};
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many objects landed in each status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Objects that passed.
    pub pass: usize,
    /// Objects that failed.
    pub fail: usize,
    /// Objects the check skipped.
    pub skip: usize,
    /// Objects with no recognizable result.
    pub unknown: usize,
}

impl StatusCounts {
    /// Counts one more status.
    pub fn observe(&mut self, status: Status) {
        match status {
            Status::Pass => self.pass += 1,
            Status::Fail => self.fail += 1,
            Status::Skip => self.skip += 1,
            Status::Unknown => self.unknown += 1,
        }
    }

    /// Tallies a set of statuses.
    pub fn tally<I>(statuses: I) -> StatusCounts
    where
        I: IntoIterator<Item = Status>,
    {
        let mut counts = StatusCounts::default();
        for status in statuses {
            counts.observe(status);
        }
        counts
    }

    /// Total number of counted objects.
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip + self.unknown
    }
}

impl fmt::Display for StatusCounts {
    /// Renders only the non-zero buckets, e.g. `pass 12, fail 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return f.write_str("none");
        }
        let buckets = [
            ("pass", self.pass),
            ("fail", self.fail),
            ("skip", self.skip),
            ("unknown", self.unknown),
        ];
        let mut first = true;
        for (name, count) in buckets {
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name} {count}")?;
            first = false;
        }
        Ok(())
    }
}

/// One check, rolled up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    /// Name of the check.
    pub name: String,
    /// Category of the check.
    pub kind: String,
    /// Severity roll-up over the check's object results.
    pub status: Status,
    /// Status counts over the check's object results.
    pub counts: StatusCounts,
}

impl CheckSummary {
    /// Summarizes one check result.
    pub fn of(check: &CheckResult) -> CheckSummary {
        CheckSummary {
            name: check.name.clone(),
            kind: check.kind.clone(),
            status: check.roll_up(),
            counts: StatusCounts::tally(check.statuses()),
        }
    }
}

/// One run, rolled up check by check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the summarized run.
    pub run_id: String,
    /// Version of the tool that produced the run.
    pub version: String,
    /// When the run started, if the producer recorded it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Severity roll-up over all checks.
    pub status: Status,
    /// Per-check summaries, in run order.
    pub checks: Vec<CheckSummary>,
}

impl RunSummary {
    /// Summarizes a finished report.
    pub fn of(report: &RunReport) -> RunSummary {
        RunSummary {
            run_id: report.run_id.clone(),
            version: report.version.clone(),
            created_at: report.created_at(),
            status: report.roll_up(),
            checks: report.checks.iter().map(CheckSummary::of).collect(),
        }
    }

    /// Sums the status counts of every check in the run.
    pub fn totals(&self) -> StatusCounts {
        let mut totals = StatusCounts::default();
        for check in &self.checks {
            totals.pass += check.counts.pass;
            totals.fail += check.counts.fail;
            totals.skip += check.counts.skip;
            totals.unknown += check.counts.unknown;
        }
        totals
    }
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> RunSummary {
        RunSummary::of(report)
    }
}

impl fmt::Display for RunSummary {
    /// Renders one line for the run and one indented line per check.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} (v{}): {}", self.run_id, self.version, self.status)?;
        for check in &self.checks {
            write!(f, "\n  {} [{}]: {}", check.name, check.kind, check.status)?;
            if check.counts.total() == 0 {
                write!(f, " (no results)")?;
            } else {
                write!(f, " ({})", check.counts)?;
            }
        }
        Ok(())
    }
}
