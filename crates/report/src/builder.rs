// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Append-only construction of a [`RunReport`].
//!
//! The builder enforces the lifecycle a report goes through while a
//! run executes: open the run, append checks, append object results
//! under those checks, finalize exactly once. Appends never rewrite
//! earlier results, and every mutation after [`RunBuilder::finalize`]
//! fails with [`ReportError::AlreadyFinalized`].

use crate::error::{ReportError, Result};
use crate::report::{CheckResult, ObjectResult, Payload, RunReport, Timestamp};
use crate::status::Status;
use chrono::{DateTime, Utc};

/// Handle to a check appended with [`RunBuilder::add_check`].
///
/// Handles are only meaningful for the builder that issued them.
/// Presenting a handle to a different builder fails with
/// [`ReportError::UnknownCheck`] unless that builder happens to have
/// at least as many checks, in which case the results land under the
/// check at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckId(usize);

/// Accumulates one run's results and produces the finished report.
#[derive(Debug)]
pub struct RunBuilder {
    report: RunReport,
    finalized: bool,
}

impl RunBuilder {
    /// Opens a new run with the given identifying metadata.
    ///
    /// The start time is left unset; record it with
    /// [`RunBuilder::set_created_at`] when the run actually starts.
    pub fn new(
        version: impl Into<String>,
        run_id: impl Into<String>,
        description: impl Into<String>,
    ) -> RunBuilder {
        RunBuilder {
            report: RunReport {
                created_at: None,
                version: version.into(),
                checks: Vec::new(),
                run_id: run_id.into(),
                description: description.into(),
            },
            finalized: false,
        }
    }

    /// Records when the run started.
    pub fn set_created_at(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.ensure_open()?;
        self.report.created_at = Some(Timestamp::from_datetime(at));
        Ok(())
    }

    /// Appends a check and returns the handle results are recorded
    /// under.
    pub fn add_check(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<CheckId> {
        self.ensure_open()?;
        self.report.checks.push(CheckResult::new(name, kind));
        Ok(CheckId(self.report.checks.len() - 1))
    }

    /// Appends one object's outcome under the given check.
    ///
    /// Object results are kept in append order and never deduplicated:
    /// recording the same `object_id` twice yields two entries, and
    /// consumers see both. A payload is accepted with any status, but
    /// its value must satisfy the variant's validation rules.
    pub fn add_object_result(
        &mut self,
        check: CheckId,
        object_id: impl Into<String>,
        status: Status,
        payload: Option<Payload>,
    ) -> Result<()> {
        self.ensure_open()?;
        let slot = self
            .report
            .checks
            .get_mut(check.0)
            .ok_or(ReportError::UnknownCheck { index: check.0 })?;

        let object_id = object_id.into();
        if let Some(payload) = &payload {
            validate_payload(&object_id, payload)?;
        }

        slot.object_results.push(ObjectResult {
            object_id,
            status: status as i32,
            payload,
        });
        Ok(())
    }

    /// Closes the run and hands the finished report to the caller.
    ///
    /// The builder stays behind in a spent state: this call and every
    /// other mutation afterwards fail with
    /// [`ReportError::AlreadyFinalized`].
    pub fn finalize(&mut self) -> Result<RunReport> {
        self.ensure_open()?;
        self.finalized = true;
        Ok(std::mem::take(&mut self.report))
    }

    /// Whether [`RunBuilder::finalize`] has already succeeded.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            Err(ReportError::AlreadyFinalized)
        } else {
            Ok(())
        }
    }
}

/// Checks a payload value against its variant's rules.
///
/// Exhaustive on purpose: adding a payload variant forces a decision
/// about what makes that variant's values acceptable.
fn validate_payload(object_id: &str, payload: &Payload) -> Result<()> {
    match payload {
        Payload::Nccl(nccl) => {
            if nccl.bandwidth_gbps < 0 {
                return Err(ReportError::InvalidPayload {
                    object_id: object_id.to_owned(),
                    reason: "bandwidth_gbps must be non-negative".to_owned(),
                });
            }
        }
    }
    Ok(())
}
