//! Wire-format tests against hand-assembled protobuf bytes.
//!
//! The byte vectors here are written out key by key so that any drift
//! in field numbers or encoding shows up as a literal byte mismatch,
//! not just a failed round-trip.

use chrono::{TimeZone, Utc};
use clusterscan_report::{
    CheckResult, NcclResult, ObjectResult, Payload, ReportError, RunBuilder, RunReport, Status,
};
use prost::Message;

/// `ObjectResult { object_id: "node-1", status: PASS, payload: Nccl(400) }`.
fn golden_object_result() -> Vec<u8> {
    vec![
        0x0A, 0x06, b'n', b'o', b'd', b'e', b'-', b'1', // object_id = "node-1"
        0x10, 0x01, // status = 1 (PASS)
        0x1A, 0x03, 0x08, 0x90, 0x03, // payload.nccl = { bandwidth_gbps: 400 }
    ]
}

#[test]
fn object_result_matches_hand_assembled_bytes() {
    let result = ObjectResult {
        object_id: "node-1".into(),
        status: Status::Pass as i32,
        payload: Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
    };

    assert_eq!(result.encode_to_vec(), golden_object_result());
    assert_eq!(
        ObjectResult::decode(golden_object_result().as_slice()).unwrap(),
        result
    );
}

#[test]
fn run_report_matches_hand_assembled_bytes() {
    let mut report = RunReport {
        version: "1.0".into(),
        run_id: "run-42".into(),
        ..RunReport::default()
    };
    let mut check = CheckResult::new("nccl-bandwidth", "network");
    check.object_results.push(ObjectResult {
        object_id: "node-1".into(),
        status: Status::Pass as i32,
        payload: Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
    });
    report.checks.push(check);

    #[rustfmt::skip]
    let golden: Vec<u8> = vec![
        // version = "1.0" (field 2)
        0x12, 0x03, b'1', b'.', b'0',
        // checks[0] (field 3), 42 bytes
        0x1A, 0x2A,
            // name = "nccl-bandwidth" (field 1)
            0x0A, 0x0E, b'n', b'c', b'c', b'l', b'-', b'b', b'a', b'n',
                        b'd', b'w', b'i', b'd', b't', b'h',
            // kind = "network" (field 2)
            0x12, 0x07, b'n', b'e', b't', b'w', b'o', b'r', b'k',
            // object_results[0] (field 3), 15 bytes
            0x1A, 0x0F,
                0x0A, 0x06, b'n', b'o', b'd', b'e', b'-', b'1',
                0x10, 0x01,
                0x1A, 0x03, 0x08, 0x90, 0x03,
        // run_id = "run-42" (field 4); created_at and description are
        // unset and therefore absent
        0x22, 0x06, b'r', b'u', b'n', b'-', b'4', b'2',
    ];

    assert_eq!(report.to_bytes(), golden);
    assert_eq!(RunReport::from_bytes(&golden).unwrap(), report);
}

#[test]
fn empty_report_encodes_to_zero_bytes() {
    let report = RunReport::default();
    assert!(report.to_bytes().is_empty());
    assert_eq!(RunReport::from_bytes(&[]).unwrap(), report);
}

#[test]
fn unknown_payload_variant_decodes_to_no_payload() {
    // A producer one schema revision ahead wrote a payload variant
    // under field 4, which this build has never heard of.
    let mut bytes = vec![
        0x0A, 0x06, b'n', b'o', b'd', b'e', b'-', b'1', // object_id
        0x10, 0x02, // status = 2 (FAIL)
    ];
    bytes.extend_from_slice(&[0x22, 0x02, 0x08, 0x2A]); // field 4, unknown message

    let decoded = ObjectResult::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded.object_id, "node-1");
    assert_eq!(decoded.status(), Status::Fail);
    assert_eq!(decoded.payload, None);

    // Re-encoding keeps the recognized fields only.
    assert_eq!(
        decoded.encode_to_vec(),
        vec![0x0A, 0x06, b'n', b'o', b'd', b'e', b'-', b'1', 0x10, 0x02]
    );
}

#[test]
fn unknown_trailing_fields_are_skipped() {
    let mut bytes = golden_object_result();
    bytes.extend_from_slice(&[0x30, 0x2A]); // field 6, varint 42
    bytes.extend_from_slice(&[0x3A, 0x03, b'e', b'x', b't']); // field 7, bytes

    let decoded = ObjectResult::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded.object_id, "node-1");
    assert_eq!(decoded.status(), Status::Pass);
    assert_eq!(decoded.nccl().map(|n| n.bandwidth_gbps), Some(400));
}

#[test]
fn duplicated_payload_field_keeps_the_last_value() {
    let mut bytes = golden_object_result();
    bytes.extend_from_slice(&[0x1A, 0x02, 0x08, 0x32]); // payload again, 50 GB/s

    let decoded = ObjectResult::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded.nccl().map(|n| n.bandwidth_gbps), Some(50));
}

#[test]
fn truncated_input_is_a_decode_error() {
    let golden = golden_object_result();
    assert!(ObjectResult::decode(&golden[..golden.len() - 1]).is_err());

    let err = RunReport::from_bytes(&golden[..4]).unwrap_err();
    assert!(matches!(err, ReportError::Decode(_)));
}

#[test]
fn bandwidth_run_recovers_both_nodes_in_order() {
    let mut run = RunBuilder::new("1.0", "run-42", "");
    let check = run.add_check("nccl-bandwidth", "network").unwrap();
    run.add_object_result(
        check,
        "node-1",
        Status::Pass,
        Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
    )
    .unwrap();
    run.add_object_result(
        check,
        "node-2",
        Status::Fail,
        Some(Payload::Nccl(NcclResult { bandwidth_gbps: 50 })),
    )
    .unwrap();
    let report = run.finalize().unwrap();

    let decoded = RunReport::from_bytes(&report.to_bytes()).unwrap();
    assert_eq!(decoded.version, "1.0");
    assert_eq!(decoded.run_id, "run-42");
    assert_eq!(decoded.checks.len(), 1);
    assert_eq!(decoded.checks[0].name, "nccl-bandwidth");
    assert_eq!(decoded.checks[0].kind, "network");

    let results = &decoded.checks[0].object_results;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].object_id, "node-1");
    assert_eq!(results[0].status(), Status::Pass);
    assert_eq!(results[0].nccl().map(|n| n.bandwidth_gbps), Some(400));
    assert_eq!(results[1].object_id, "node-2");
    assert_eq!(results[1].status(), Status::Fail);
    assert_eq!(results[1].nccl().map(|n| n.bandwidth_gbps), Some(50));
}

#[test]
fn full_run_survives_a_round_trip() {
    let started = Utc.with_ymd_and_hms(2025, 6, 1, 3, 15, 0).unwrap();

    let mut run = RunBuilder::new("1.4.0", "run-42", "nightly sweep");
    run.set_created_at(started).unwrap();

    let bandwidth = run.add_check("nccl-bandwidth", "network").unwrap();
    let gpus = run.add_check("gpu-count", "hardware").unwrap();
    let _thermal = run.add_check("thermal", "hardware").unwrap();

    run.add_object_result(
        bandwidth,
        "node-1",
        Status::Pass,
        Some(Payload::Nccl(NcclResult { bandwidth_gbps: 400 })),
    )
    .unwrap();
    run.add_object_result(
        bandwidth,
        "node-2",
        Status::Fail,
        Some(Payload::Nccl(NcclResult { bandwidth_gbps: 17 })),
    )
    .unwrap();
    run.add_object_result(gpus, "node-1", Status::Pass, None).unwrap();
    run.add_object_result(gpus, "node-2", Status::Skip, None).unwrap();
    run.add_object_result(gpus, "node-3", Status::Unknown, None)
        .unwrap();
    // The thermal check ran but observed nothing; it still appears in
    // the report.

    let report = run.finalize().unwrap();
    let decoded = RunReport::from_bytes(&report.to_bytes()).unwrap();

    assert_eq!(decoded, report);
    assert_eq!(decoded.created_at(), Some(started));
    assert_eq!(decoded.run_id, "run-42");
    assert_eq!(decoded.checks.len(), 3);
    assert_eq!(decoded.checks[0].roll_up(), Status::Fail);
    assert_eq!(decoded.checks[1].roll_up(), Status::Skip);
    assert_eq!(decoded.checks[2].name, "thermal");
    assert!(decoded.checks[2].object_results.is_empty());
    assert_eq!(decoded.checks[2].roll_up(), Status::Unknown);
    assert_eq!(decoded.roll_up(), Status::Fail);

    // Statuses decode to exactly what was recorded, in order.
    let gpu_statuses: Vec<Status> = decoded.checks[1].statuses().collect();
    assert_eq!(
        gpu_statuses,
        vec![Status::Pass, Status::Skip, Status::Unknown]
    );
}

#[test]
fn handles_are_positional_across_builders() {
    let mut first = RunBuilder::new("1.0.0", "run-a", "");
    first.add_check("nccl-bandwidth", "network").unwrap();
    let second_check = first.add_check("gpu-count", "hardware").unwrap();

    // A builder with fewer checks rejects the foreign handle.
    let mut other = RunBuilder::new("1.0.0", "run-b", "");
    other.add_check("thermal", "hardware").unwrap();
    assert!(matches!(
        other.add_object_result(second_check, "node-1", Status::Pass, None),
        Err(ReportError::UnknownCheck { index: 1 })
    ));

    // Once a check exists at that position, the handle addresses it.
    other.add_check("dcgm", "hardware").unwrap();
    other
        .add_object_result(second_check, "node-1", Status::Pass, None)
        .unwrap();
    let report = other.finalize().unwrap();
    assert_eq!(report.checks[1].object_results.len(), 1);
}
