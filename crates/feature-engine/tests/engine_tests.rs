use approx::assert_relative_eq;
use feature_engine::*;
use modeling_ops::Diagnostics;
use solid_kernel::{Kernel, KernelIntrospect, KernelSolidHandle, MockKernel, MockOp};
use steel_types::sketch::rect_loop;
use steel_types::*;

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Box of `w` x `d` footprint standing `h` tall on the XZ plane.
fn upright_box(kernel: &mut MockKernel, w: f64, d: f64, h: f64) -> KernelSolidHandle {
    let profile = PlanarProfile::with_axes(
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        rect_loop(0.0, 0.0, w, d),
    );
    kernel.extrude_profile(&profile, [0.0, 1.0, 0.0], h).unwrap()
}

fn hss6() -> Profile {
    Profile::rect_hss("HSS6x6x1/4", 6.0, 6.0, 0.233)
}

fn w10() -> Profile {
    Profile::wide_flange("W10x33", 9.73, 7.96, 0.435, 0.29)
}

fn pipe() -> Profile {
    Profile::round_hss("HSS6.625x0.280", 6.625, 0.261)
}

fn tube(kernel: &mut MockKernel, profile: &Profile, length: f64) -> KernelSolidHandle {
    let (w, h, t) = match profile.shape {
        Shape::RectHss {
            outer_width,
            outer_height,
            wall_thickness,
            ..
        } => (outer_width, outer_height, wall_thickness),
        Shape::RoundHss {
            outer_diameter,
            wall_thickness,
        } => (outer_diameter, outer_diameter, wall_thickness),
        Shape::WideFlange { .. } => panic!("not a tube"),
    };
    let section = PlanarProfile::xy(0.0, rect_loop(0.0, 0.0, w, h))
        .with_hole(rect_loop(0.0, 0.0, w - 2.0 * t, h - 2.0 * t));
    kernel.extrude_profile(&section, [0.0, 0.0, 1.0], length).unwrap()
}

fn i_shape(kernel: &mut MockKernel, profile: &Profile, length: f64) -> KernelSolidHandle {
    let Shape::WideFlange {
        depth: d,
        flange_width: bf,
        flange_thickness: tf,
        web_thickness: tw,
        ..
    } = profile.shape
    else {
        panic!("not an I-shape");
    };
    let (hd, hb, hw) = (d / 2.0, bf / 2.0, tw / 2.0);
    let outline = vec![
        [-hb, -hd],
        [hb, -hd],
        [hb, -hd + tf],
        [hw, -hd + tf],
        [hw, hd - tf],
        [hb, hd - tf],
        [hb, hd],
        [-hb, hd],
        [-hb, hd - tf],
        [-hw, hd - tf],
        [-hw, -hd + tf],
        [-hb, -hd + tf],
    ];
    kernel
        .extrude_profile(&PlanarProfile::xy(0.0, outline), [0.0, 0.0, 1.0], length)
        .unwrap()
}

fn apply_all(
    kernel: &mut MockKernel,
    solid: &KernelSolidHandle,
    features: Vec<Feature>,
    ctx: &FeatureContext,
) -> (FeatureRun, Diagnostics) {
    let mut diags = Diagnostics::new();
    let run = apply_features(kernel, solid, &features, ctx, &mut diags);
    (run, diags)
}

fn surface_count(kernel: &MockKernel, solid: &KernelSolidHandle, kind: &str) -> usize {
    kernel
        .compute_all_signatures(solid, TopoKind::Face)
        .iter()
        .filter(|(_, s)| s.surface_type.as_deref() == Some(kind))
        .count()
}

// ── Fillet Tests ────────────────────────────────────────────────────────────

#[test]
fn test_fillet_vertical_edges_of_box() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Vertical,
            radius: 0.5,
        })],
        &ctx,
    );

    assert!(run.steps[0].outcome.is_applied(), "{:?}", run.steps[0]);
    assert_ne!(run.solid, solid);
    assert_eq!(surface_count(&kernel, &run.solid, "cylindrical"), 4);
    assert!(diags.is_empty());
}

#[test]
fn test_all_group_lists_rounded_edges_after_fillet() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);
    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Vertical,
            radius: 0.5,
        })],
        &ctx,
    );

    let all = classify_edges(&kernel, &run.solid, EdgeGroup::All, &ctx.frame, &ctx.config);
    assert_eq!(all, kernel.list_edges(&run.solid));
    let sharp = kernel
        .compute_all_signatures(&run.solid, TopoKind::Edge)
        .iter()
        .filter(|(_, s)| s.is_sharp_edge())
        .count();
    assert!(all.len() > sharp, "{} edges, {} sharp", all.len(), sharp);

    // Positional groups still see only sharp edges.
    let vertical = classify_edges(&kernel, &run.solid, EdgeGroup::Vertical, &ctx.frame, &ctx.config);
    assert!(vertical.is_empty(), "{:?}", vertical);
}

#[test]
fn test_fillet_without_matching_edges_is_skipped() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    // Nominal height far from the real top: no edge sits on "top".
    let ctx = FeatureContext::upright(4.0, 25.0);

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Top,
            radius: 0.5,
        })],
        &ctx,
    );

    assert!(matches!(run.steps[0].outcome, StepOutcome::Skipped { .. }));
    assert_eq!(run.solid, solid);
    assert!(diags.mentions("skipped"));
}

#[test]
fn test_fillet_radius_too_large_fails_and_keeps_solid() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Vertical,
            radius: 50.0,
        })],
        &ctx,
    );

    assert!(matches!(run.steps[0].outcome, StepOutcome::Failed { .. }));
    assert_eq!(run.solid, solid);
}

// ── Sketch Tests ────────────────────────────────────────────────────────────

#[test]
fn test_sketch_cut_on_top_face() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Sketch {
            face: FaceName::Top,
            profile: SketchProfile::Circle { radius: 1.0 },
            operation: SketchOp::Cut,
            amount: 2.0,
            center: [0.0, 0.0],
        })],
        &ctx,
    );

    match &run.steps[0].outcome {
        StepOutcome::Applied { created_faces } => assert!(*created_faces > 0),
        other => panic!("expected applied, got {:?}", other),
    }
    // Cuts never grow the envelope.
    let bb = kernel.bounding_box(&run.solid).unwrap();
    assert_relative_eq!(bb.max[1], 10.0, epsilon = 1e-9);
}

#[test]
fn test_sketch_extrude_grows_body() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Sketch {
            face: FaceName::Right,
            profile: SketchProfile::Rectangle {
                width: 1.0,
                height: 1.0,
            },
            operation: SketchOp::Extrude,
            amount: 3.0,
            center: [0.0, 0.0],
        })],
        &ctx,
    );

    assert!(run.steps[0].outcome.is_applied());
    let bb = kernel.bounding_box(&run.solid).unwrap();
    assert_relative_eq!(bb.max[0], 5.0, epsilon = 1e-9);
}

#[test]
fn test_sketch_zero_amount_fails_but_later_features_run() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![
            Feature::new(FeatureKind::Sketch {
                face: FaceName::Top,
                profile: SketchProfile::Circle { radius: 1.0 },
                operation: SketchOp::Cut,
                amount: 0.0,
                center: [0.0, 0.0],
            }),
            Feature::new(FeatureKind::Fillet {
                edges: EdgeGroup::Vertical,
                radius: 0.25,
            }),
        ],
        &ctx,
    );

    assert!(matches!(run.steps[0].outcome, StepOutcome::Failed { .. }));
    assert!(run.steps[1].outcome.is_applied());
    assert_eq!(run.applied_count(), 1);
    assert!(diags.mentions("failed"));
}

// ── Pipeline Tests ──────────────────────────────────────────────────────────

#[test]
fn test_disabled_feature_is_recorded_and_not_run() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Vertical,
            radius: 0.5,
        })
        .disabled()],
        &ctx,
    );

    assert_eq!(run.steps[0].outcome, StepOutcome::Disabled);
    assert_eq!(run.solid, solid);
    assert_eq!(run.applied_count(), 0);
}

#[test]
fn test_empty_feature_list_returns_input() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);
    let (run, diags) = apply_all(&mut kernel, &solid, Vec::new(), &ctx);
    assert_eq!(run.solid, solid);
    assert!(run.steps.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_member_feature_without_profile_fails() {
    let mut kernel = MockKernel::new();
    let solid = upright_box(&mut kernel, 4.0, 6.0, 10.0);
    let ctx = FeatureContext::upright(4.0, 10.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::EndPlate {
            end: MemberEnd::Start,
            thickness: 0.5,
            height: None,
            width: None,
        })],
        &ctx,
    );

    match &run.steps[0].outcome {
        StepOutcome::Failed { error } => assert!(error.contains("member profile")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_kernel_failure_is_contained() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);
    kernel.fail_on(MockOp::Subtract);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![
            Feature::new(FeatureKind::BoltHoles {
                location: HoleLocation::Front,
                diameter: 0.75,
                count: 2,
                spacing: 3.0,
                position: HolePosition::End,
            }),
            Feature::new(FeatureKind::EndPlate {
                end: MemberEnd::End,
                thickness: 0.5,
                height: None,
                width: None,
            }),
        ],
        &ctx,
    );

    assert!(matches!(run.steps[0].outcome, StepOutcome::Failed { .. }));
    assert!(run.steps[1].outcome.is_applied());
    assert_eq!(run.steps[1].index, 1);
    assert_eq!(run.steps[1].feature_type, "end_plate");
}

#[test]
fn test_features_from_json() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);

    let features: Vec<Feature> = serde_json::from_str(
        r#"[
            {"type": "bolt_holes", "location": "web", "count": 3},
            {"type": "cope", "end": "end", "flange": "top"},
            {"type": "slot", "face": "left", "enabled": false}
        ]"#,
    )
    .unwrap();
    let (run, _) = apply_all(&mut kernel, &solid, features, &ctx);

    assert!(run.steps[0].outcome.is_applied());
    assert!(run.steps[1].outcome.is_applied());
    assert_eq!(run.steps[2].outcome, StepOutcome::Disabled);
}

#[test]
fn test_step_serializes_flat() {
    let step = FeatureStep {
        index: 2,
        feature_type: "slot",
        outcome: StepOutcome::Skipped {
            reason: "no Front face".to_string(),
        },
    };
    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(json["index"], 2);
    assert_eq!(json["feature_type"], "slot");
    assert_eq!(json["outcome"], "skipped");
    assert_eq!(json["reason"], "no Front face");
}

// ── Bolt Hole Tests ─────────────────────────────────────────────────────────

#[test]
fn test_bolt_holes_in_tube_wall_keep_envelope() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);
    let before = kernel.bounding_box(&solid).unwrap();

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::Web,
            diameter: 0.75,
            count: 2,
            spacing: 3.0,
            position: HolePosition::Start,
        })],
        &ctx,
    );

    assert!(run.steps[0].outcome.is_applied());
    assert_eq!(kernel.bounding_box(&run.solid).unwrap(), before);
    assert!(diags.is_empty());
}

#[test]
fn test_flange_holes_come_in_pairs() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);
    let base_faces = kernel.list_faces(&solid).len();

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::TopFlange,
            diameter: 0.75,
            count: 2,
            spacing: 3.0,
            position: HolePosition::Center,
        })],
        &ctx,
    );

    assert!(run.steps[0].outcome.is_applied());
    // Four cylinders of 32 sides plus two caps each.
    assert_eq!(kernel.list_faces(&run.solid).len(), base_faces + 4 * 34);
}

#[test]
fn test_hole_outside_member_warns() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::Front,
            diameter: 0.75,
            count: 2,
            spacing: 3.0,
            position: HolePosition::At(-5.0),
        })],
        &ctx,
    );

    assert!(diags.mentions("outside the member"));
    assert_eq!(run.steps.len(), 1);
}

#[test]
fn test_flange_holes_on_round_tube_unsupported() {
    let mut kernel = MockKernel::new();
    let profile = pipe();
    let solid = tube(&mut kernel, &profile, 60.0);
    let ctx = FeatureContext::member(&profile, 60.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::TopFlange,
            diameter: 0.75,
            count: 1,
            spacing: 3.0,
            position: HolePosition::Center,
        })],
        &ctx,
    );

    match &run.steps[0].outcome {
        StepOutcome::Failed { error } => assert!(error.contains("not supported")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_radial_holes_on_round_tube() {
    let mut kernel = MockKernel::new();
    let profile = pipe();
    let solid = tube(&mut kernel, &profile, 60.0);
    let ctx = FeatureContext::member(&profile, 60.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::Radial { angle_deg: 45.0 },
            diameter: 0.75,
            count: 1,
            spacing: 3.0,
            position: HolePosition::Center,
        })],
        &ctx,
    );
    assert!(run.steps[0].outcome.is_applied());
}

#[test]
fn test_zero_bolt_count_fails() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::BoltHoles {
            location: HoleLocation::Front,
            diameter: 0.75,
            count: 0,
            spacing: 3.0,
            position: HolePosition::Start,
        })],
        &ctx,
    );
    assert!(matches!(run.steps[0].outcome, StepOutcome::Failed { .. }));
}

// ── End Plate / Cope Tests ──────────────────────────────────────────────────

#[test]
fn test_end_plate_defaults_extend_member() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::EndPlate {
            end: MemberEnd::End,
            thickness: 0.5,
            height: None,
            width: None,
        })],
        &ctx,
    );

    assert!(run.steps[0].outcome.is_applied());
    let bb = kernel.bounding_box(&run.solid).unwrap();
    assert_relative_eq!(bb.max[2], 96.5, epsilon = 1e-9);
    assert_relative_eq!(bb.min[2], 0.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max[1], 9.73 / 2.0 + 1.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max[0], 7.96 / 2.0, epsilon = 1e-9);
}

#[test]
fn test_end_plate_at_start_sits_behind_member() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 48.0);
    let ctx = FeatureContext::member(&profile, 48.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::EndPlate {
            end: MemberEnd::Start,
            thickness: 0.75,
            height: Some(10.0),
            width: Some(10.0),
        })],
        &ctx,
    );

    let bb = kernel.bounding_box(&run.solid).unwrap();
    assert_relative_eq!(bb.min[2], -0.75, epsilon = 1e-9);
    assert_relative_eq!(bb.min[0], -5.0, epsilon = 1e-9);
}

#[test]
fn test_cope_on_wide_flange() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Cope {
            end: MemberEnd::Start,
            flange: Flange::Bottom,
            depth: 2.0,
            height: 1.5,
        })],
        &ctx,
    );
    assert!(run.steps[0].outcome.is_applied());
}

#[test]
fn test_cope_rejects_bad_height_and_hollow_sections() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);
    let cope = |height| {
        Feature::new(FeatureKind::Cope {
            end: MemberEnd::End,
            flange: Flange::Top,
            depth: 2.0,
            height,
        })
    };

    let (run, _) = apply_all(&mut kernel, &solid, vec![cope(12.0), cope(0.0)], &ctx);
    assert!(run
        .steps
        .iter()
        .all(|s| matches!(s.outcome, StepOutcome::Failed { .. })));

    let hss = hss6();
    let tube_solid = tube(&mut kernel, &hss, 48.0);
    let hss_ctx = FeatureContext::member(&hss, 48.0);
    let (run, _) = apply_all(&mut kernel, &tube_solid, vec![cope(1.5)], &hss_ctx);
    match &run.steps[0].outcome {
        StepOutcome::Failed { error } => assert!(error.contains("HSS_RECT")),
        other => panic!("expected failure, got {:?}", other),
    }
}

// ── Slot Tests ──────────────────────────────────────────────────────────────

#[test]
fn test_slot_in_tube_wall() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::Slot {
            face: FaceName::Right,
            width: 0.5625,
            length: 2.0,
            z_position: Some(10.0),
        })],
        &ctx,
    );
    assert!(run.steps[0].outcome.is_applied());
}

#[test]
fn test_slot_on_wide_flange_side_unsupported() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![
            Feature::new(FeatureKind::Slot {
                face: FaceName::Left,
                width: 0.5625,
                length: 2.0,
                z_position: None,
            }),
            Feature::new(FeatureKind::Slot {
                face: FaceName::Top,
                width: 0.5625,
                length: 2.0,
                z_position: None,
            }),
        ],
        &ctx,
    );
    assert_eq!(run.applied_count(), 0);
}

#[test]
fn test_through_plate_slot_warns_when_taller_than_section() {
    let mut kernel = MockKernel::new();
    let profile = hss6();
    let solid = tube(&mut kernel, &profile, 120.0);
    let ctx = FeatureContext::member(&profile, 120.0);

    let (run, diags) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::ThroughPlateSlot {
            position: MemberEnd::End,
            slot_height: Some(8.0),
            plate_thickness: 0.5,
        })],
        &ctx,
    );
    assert!(run.steps[0].outcome.is_applied());
    assert!(diags.mentions("exceeds section depth"));
}

#[test]
fn test_through_plate_slot_on_wide_flange_unsupported() {
    let mut kernel = MockKernel::new();
    let profile = w10();
    let solid = i_shape(&mut kernel, &profile, 96.0);
    let ctx = FeatureContext::member(&profile, 96.0);

    let (run, _) = apply_all(
        &mut kernel,
        &solid,
        vec![Feature::new(FeatureKind::ThroughPlateSlot {
            position: MemberEnd::Start,
            slot_height: None,
            plate_thickness: 0.5,
        })],
        &ctx,
    );
    assert!(matches!(run.steps[0].outcome, StepOutcome::Failed { .. }));
}
