// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-object status values and severity-based roll-up.
//!
//! Statuses are carried on the wire as plain integers, so the numeric
//! values here are part of the published schema and must never change.
//! Roll-up precedence is a separate, consumer-side concern: a check is
//! only as healthy as its worst object, and `FAIL` outranks `SKIP`
//! even though `SKIP` has the larger wire value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one check applied to one object.
///
/// `Unknown` doubles as the proto3 zero value: an object result whose
/// status field was never written decodes as `Unknown`, and so does a
/// status value produced by a newer schema revision this build does
/// not know about.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ::prost::Enumeration,
)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum Status {
    /// No result was produced, or the value was written by a newer schema.
    Unknown = 0,
    /// The check passed for this object.
    Pass = 1,
    /// The check failed for this object.
    Fail = 2,
    /// The check was not applicable to this object and was skipped.
    Skip = 3,
}

impl Status {
    /// Severity rank used for roll-up. Higher is worse.
    ///
    /// Deliberately distinct from the wire value: `Fail` must dominate
    /// `Skip`, and `Skip` must dominate `Unknown`, so the ranking is
    /// `Fail > Skip > Unknown > Pass`.
    fn severity(self) -> u8 {
        match self {
            Status::Pass => 0,
            Status::Unknown => 1,
            Status::Skip => 2,
            Status::Fail => 3,
        }
    }

    /// Returns the more severe of two statuses.
    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// Reads a raw wire value, degrading unrecognized values to `Unknown`.
    pub fn from_wire(value: i32) -> Status {
        Status::try_from(value).unwrap_or(Status::Unknown)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Unknown => "unknown",
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// Rolls a set of statuses up to the single most severe one.
///
/// An empty set rolls up to [`Status::Unknown`]: no evidence was
/// collected, so the aggregate can neither pass nor fail.
pub fn roll_up<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    let mut overall = None;
    for status in statuses {
        overall = Some(match overall {
            Some(current) => status.worst(current),
            None => status,
        });
    }
    overall.unwrap_or(Status::Unknown)
}
