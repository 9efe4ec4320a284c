//! Tests for the report module.

use frame_solver::FrameInputs;
use test_harness::helpers::*;
use test_harness::{FrameBench, HarnessError};

#[test]
fn single_frame_report() {
    let mut b = FrameBench::mock();
    b.solve("a", &scenario_a()).unwrap();
    let report = b.report("a").unwrap();
    let text = report.to_text();

    assert!(text.contains("=== Frame Report: a ==="), "{}", text);
    assert!(text.contains("Frames: 1 | header 89.000"), "{}", text);
    assert!(!text.contains("conn beam"));
    assert!(text.contains("Parts (5):"));
    assert!(text.contains("PLATE PL14x14x0.75 \"base_plate_left\""), "{}", text);
    assert!(text.contains("Warnings: none"));
    assert!(report.passed_all(), "{}", text);
}

#[test]
fn report_shows_validation_and_oracles() {
    let mut b = FrameBench::mock();
    b.solve("c", &scenario_c(100_000.0)).unwrap();
    let text = b.report("c").unwrap().to_text();

    assert!(text.contains("Validation: FAIL"), "{}", text);
    assert!(text.contains("Oracle Results"));
    assert!(text.contains("[PASS] columns_seated"), "{}", text);
}

#[test]
fn report_lists_wall_checks_and_features() {
    let mut inputs = FrameInputs::new(hss6x6x3_8(), w12x26()).with_frames(2, 120.0, Some(w12x14()));
    inputs.features.header = vec![steel_types::Feature::new(steel_types::FeatureKind::Cope {
        end: steel_types::MemberEnd::Start,
        flange: steel_types::Flange::Top,
        depth: 2.0,
        height: 1.5,
    })];

    let mut b = FrameBench::mock();
    b.solve("h", &inputs).unwrap();
    let report = b.report("h").unwrap();
    let text = report.to_text();

    assert!(text.contains("wall column: Wall adequate"), "{}", text);
    assert!(text.contains("conn beam"));
    assert!(text.contains("features 1/1"), "{}", text);
    assert_eq!(report.parts.len(), 12);
}

#[test]
fn report_bounding_box_spans_the_frame() {
    let mut b = FrameBench::mock();
    b.solve("a", &scenario_a()).unwrap();
    let report = b.report("a").unwrap();
    let (min, max) = report.bounding_box.unwrap();
    assert!((min[1] - 0.0).abs() < 1e-9);
    assert!((max[1] - 100.0).abs() < 1e-9);
    assert!(report.to_text().contains("Bounding Box:"));
}

#[test]
fn report_collects_warnings() {
    let mut b = FrameBench::mock();
    let inputs = FrameInputs::new(w10x49(), w10x49()).with_frames(2, 8.0, Some(w12x14()));
    b.solve("tight", &inputs).unwrap();
    let text = b.report("tight").unwrap().to_text();
    assert!(text.contains("Warnings ("), "{}", text);
    assert!(text.contains("frame_solver: connecting beam"), "{}", text);
}

#[test]
fn report_serializes_to_json() {
    let mut b = FrameBench::mock();
    b.solve("a", &scenario_a()).unwrap();
    let json = b.report("a").unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "a");
    assert_eq!(value["summary"]["status"], "PASS");
    assert_eq!(value["parts"].as_array().unwrap().len(), 5);
}

#[test]
fn report_for_unknown_frame() {
    let mut b = FrameBench::mock();
    assert!(matches!(
        b.report("nope"),
        Err(HarnessError::FrameNotFound { .. })
    ));
}

#[test]
fn report_display_matches_text() {
    let mut b = FrameBench::mock();
    b.solve("a", &scenario_a()).unwrap();
    let report = b.report("a").unwrap();
    assert_eq!(format!("{}", report), report.to_text());
}
