// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Wire-level report messages.
//!
//! These structs are the published schema: field numbers are pinned,
//! new fields may only be appended, and existing numbers must never be
//! reused. Messages are written with explicit presence semantics from
//! proto3, so zero-valued scalars are omitted on the wire and absent
//! fields decode to their defaults. Decoders skip field numbers they
//! do not recognize, which is what lets an older reader consume a
//! report produced by a newer writer.

use crate::error::{ReportError, Result};
use crate::status::{roll_up, Status};
use chrono::{DateTime, Utc};
use prost::Message;

/// A point in time, as whole seconds and nanoseconds since the Unix
/// epoch.
///
/// The field layout matches `google.protobuf.Timestamp`, so reports
/// produced by other toolchains interoperate without conversion.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Timestamp {
    /// Seconds since `1970-01-01T00:00:00Z`.
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    /// Nanosecond fraction, expected in `0..=999_999_999`.
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl Timestamp {
    /// Converts a UTC datetime into its wire representation.
    pub fn from_datetime(at: DateTime<Utc>) -> Timestamp {
        Timestamp {
            seconds: at.timestamp(),
            nanos: at.timestamp_subsec_nanos() as i32,
        }
    }

    /// Converts back to a UTC datetime.
    ///
    /// Returns `None` when the wire value is out of range, for example
    /// a negative nanosecond field written by a buggy producer.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Timestamp {
        Timestamp::from_datetime(at)
    }
}

/// Result payload of an NCCL bandwidth check.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NcclResult {
    /// Measured inter-node bandwidth in gigabits per second, rounded
    /// to an integer.
    #[prost(int32, tag = "1")]
    pub bandwidth_gbps: i32,
}

/// Check-specific measurement attached to an object result.
///
/// Exactly one variant can be present. Each variant owns a distinct
/// field number in [`ObjectResult`], and a decoder that does not know
/// a variant's number skips it, leaving the payload absent. Adding a
/// variant is therefore backward compatible; consumers match on the
/// enum and the compiler points at every match that needs updating.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum Payload {
    /// NCCL bandwidth measurement.
    #[prost(message, tag = "3")]
    Nccl(NcclResult),
}

/// Outcome of one check for one object.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ObjectResult {
    /// Identifier of the object that was checked, such as a node name.
    /// Opaque to this crate; producers choose the naming scheme.
    #[prost(string, tag = "1")]
    pub object_id: String,
    /// Raw wire value of the status. Prefer the generated
    /// [`ObjectResult::status()`] accessor, which degrades
    /// unrecognized values to [`Status::Unknown`].
    #[prost(enumeration = "Status", tag = "2")]
    pub status: i32,
    /// Optional check-specific measurement.
    #[prost(oneof = "Payload", tags = "3")]
    pub payload: Option<Payload>,
}

impl ObjectResult {
    /// Creates a result with no payload.
    pub fn new(object_id: impl Into<String>, status: Status) -> ObjectResult {
        ObjectResult {
            object_id: object_id.into(),
            status: status as i32,
            payload: None,
        }
    }

    /// Returns the NCCL payload, if that is the variant present.
    pub fn nccl(&self) -> Option<&NcclResult> {
        match &self.payload {
            Some(Payload::Nccl(result)) => Some(result),
            None => None,
        }
    }
}

/// All object-level outcomes of a single check within a run.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CheckResult {
    /// Name of the check, such as `nccl-bandwidth`.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Category of the check, such as `network` or `hardware`.
    #[prost(string, tag = "2")]
    pub kind: String,
    /// Per-object outcomes, in the order they were recorded.
    #[prost(message, repeated, tag = "3")]
    pub object_results: Vec<ObjectResult>,
}

impl CheckResult {
    /// Creates an empty check result.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> CheckResult {
        CheckResult {
            name: name.into(),
            kind: kind.into(),
            object_results: Vec::new(),
        }
    }

    /// Iterates over the decoded statuses of all object results.
    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.object_results.iter().map(ObjectResult::status)
    }

    /// Rolls the object statuses up to a single check-level status.
    ///
    /// A check with no object results rolls up to
    /// [`Status::Unknown`].
    pub fn roll_up(&self) -> Status {
        roll_up(self.statuses())
    }
}

/// Root message: everything produced by one health-check run.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunReport {
    /// When the run started. Absent if the producer never set it.
    #[prost(message, optional, tag = "1")]
    pub created_at: Option<Timestamp>,
    /// Version of the tool that produced the run.
    #[prost(string, tag = "2")]
    pub version: String,
    /// Results of every check executed in this run, in execution
    /// order.
    #[prost(message, repeated, tag = "3")]
    pub checks: Vec<CheckResult>,
    /// Identifier correlating all results of one run.
    #[prost(string, tag = "4")]
    pub run_id: String,
    /// Free-form description of why the run happened.
    #[prost(string, tag = "5")]
    pub description: String,
}

impl RunReport {
    /// Serializes the report to its wire form.
    ///
    /// Fields are written in tag order, so encoding the same value
    /// always yields the same bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Deserializes a report from its wire form.
    ///
    /// Unrecognized field numbers anywhere in the message tree are
    /// skipped, never rejected. Only structurally broken input, such
    /// as a truncated length delimiter, produces
    /// [`ReportError::Decode`].
    pub fn from_bytes(bytes: &[u8]) -> Result<RunReport> {
        RunReport::decode(bytes).map_err(ReportError::from)
    }

    /// Returns the run start time as a UTC datetime, if one was set
    /// and is representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_ref().and_then(Timestamp::to_datetime)
    }

    /// Rolls the whole run up to a single status: the worst of all
    /// check-level roll-ups.
    ///
    /// A run with no checks rolls up to [`Status::Unknown`].
    pub fn roll_up(&self) -> Status {
        roll_up(self.checks.iter().map(CheckResult::roll_up))
    }
}
