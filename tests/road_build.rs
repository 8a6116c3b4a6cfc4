//! End-to-end road builds against the in-memory scene.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use approx::assert_relative_eq;
use roadbed::error::{BuildError, RoadbedError, SceneError};
use roadbed::geometry::Polyline;
use roadbed::math::Point3;
use roadbed::scene::{MemoryScene, SceneCall, SceneGraph, SceneOp};
use roadbed::{build_road, RoadParameters};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A straight centerline along +X, so left is -Z and right is +Z.
fn straight_scene() -> MemoryScene {
    init_tracing();
    let mut scene = MemoryScene::new();
    let line = Polyline::open(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(25.0, 0.0, 0.0),
        Point3::new(50.0, 0.0, 0.0),
    ])
    .unwrap();
    scene.add_curve("curve1", line);
    scene
}

/// A centerline with a bend and some elevation change.
fn winding_scene() -> MemoryScene {
    init_tracing();
    let mut scene = MemoryScene::new();
    let line = Polyline::open(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(30.0, 1.0, 5.0),
        Point3::new(55.0, 2.0, 30.0),
        Point3::new(60.0, 2.0, 70.0),
    ])
    .unwrap();
    scene.add_curve("curve1", line);
    scene
}

#[test]
fn produces_twelve_curves_eleven_surfaces_three_groups() {
    let mut scene = winding_scene();
    let build = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    assert_eq!(build.curves.len(), 12);
    assert_eq!(build.surfaces.len(), 11);
    assert_eq!(build.groups.all().len(), 3);

    let mut names: HashSet<&str> = HashSet::new();
    for name in build
        .curves
        .iter()
        .chain(&build.surfaces)
        .map(String::as_str)
        .chain(build.groups.all())
    {
        assert!(names.insert(name), "duplicate name {name}");
        assert!(scene.exists(name), "{name} missing from scene");
    }
}

#[test]
fn generated_names_for_curve1() {
    let mut scene = straight_scene();
    let build = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    let expected_curves: Vec<String> = [
        "road",
        "drain",
        "curbBase",
        "curbTop",
        "sidewalk",
        "sidewalkCurb",
    ]
    .iter()
    .flat_map(|role| ["L", "R"].map(|side| format!("curve1_{role}_{side}_crv")))
    .collect();
    assert_eq!(build.curves, expected_curves);

    let mut expected_surfaces = vec!["curve1_road_srf".to_owned()];
    for role in ["drain", "curbWall", "drainCap", "sidewalk", "sidewalkBorder"] {
        for side in ["L", "R"] {
            expected_surfaces.push(format!("curve1_{role}_{side}_srf"));
        }
    }
    assert_eq!(build.surfaces, expected_surfaces);

    assert_eq!(
        build.groups.all(),
        [
            "curve1_roadCurves_GRP",
            "curve1_roadSurfaces_GRP",
            "curve1_roadSystem_GRP"
        ]
    );
}

#[test]
fn left_and_right_offsets_are_negations() {
    let params = RoadParameters::default()
        .with_road_offset(4.25)
        .with_drain_offset(-0.3)
        .with_curb_offset(0.0)
        .with_sidewalk_offset(1.75)
        .with_sidewalk_curb_offset(0.15);
    let mut scene = winding_scene();
    build_road(&mut scene, "curve1", &params).unwrap();

    let distances: Vec<f64> = scene
        .calls()
        .iter()
        .filter_map(|call| match call {
            SceneCall::OffsetCurve { distance, .. } => Some(*distance),
            _ => None,
        })
        .collect();
    assert_eq!(distances.len(), 10);
    for pair in distances.chunks(2) {
        assert_eq!(pair[0], -pair[1]);
    }
    assert_eq!(distances[0], 4.25);
    assert_eq!(distances[2], -0.3);
}

#[test]
fn profile_lands_where_expected() {
    let mut scene = straight_scene();
    build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    let expect = |name: &str, y: f64, z: f64| {
        let curve = scene.world_curve(name).unwrap();
        for p in curve.points() {
            assert_relative_eq!(p.y, y, epsilon = 1e-9);
            assert_relative_eq!(p.z, z, epsilon = 1e-9);
        }
    };

    expect("curve1_road_L_crv", 0.0, -3.0);
    expect("curve1_road_R_crv", 0.0, 3.0);
    expect("curve1_drain_L_crv", 0.0, -3.5);
    expect("curve1_curbBase_R_crv", 0.0, 3.7);
    expect("curve1_curbTop_L_crv", 0.2, -3.7);
    expect("curve1_sidewalk_L_crv", 0.2, -5.7);
    expect("curve1_sidewalkCurb_R_crv", 0.2, 5.9);
}

#[test]
fn road_bed_spans_both_edges() {
    let mut scene = straight_scene();
    build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    let srf = scene.surface("curve1_road_srf").unwrap();
    for i in 0..srf.ruling_count() {
        let (a, b) = srf.ruling(i).unwrap();
        assert_relative_eq!(a.z, -3.0, epsilon = 1e-9);
        assert_relative_eq!(b.z, 3.0, epsilon = 1e-9);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
    }
}

#[test]
fn curb_top_is_curb_base_raised_by_curb_height() {
    for height in [0.0, 0.2, -0.35, 1.5] {
        let mut scene = winding_scene();
        let params = RoadParameters::default().with_curb_height(height);
        build_road(&mut scene, "curve1", &params).unwrap();

        for side in ["L", "R"] {
            let base = scene
                .world_curve(&format!("curve1_curbBase_{side}_crv"))
                .unwrap();
            let top = scene
                .world_curve(&format!("curve1_curbTop_{side}_crv"))
                .unwrap();
            assert_eq!(base.len(), top.len());
            for (b, t) in base.points().iter().zip(top.points()) {
                assert_relative_eq!(t.x, b.x, epsilon = 1e-12);
                assert_relative_eq!(t.y - b.y, height, epsilon = 1e-12);
                assert_relative_eq!(t.z, b.z, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn groups_hold_exactly_what_was_built() {
    let mut scene = winding_scene();
    let build = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    assert_eq!(
        scene.children(&build.groups.master).unwrap(),
        vec![build.groups.curves.clone(), build.groups.surfaces.clone()]
    );
    assert_eq!(scene.children(&build.groups.curves).unwrap(), build.curves);
    assert_eq!(scene.children(&build.groups.surfaces).unwrap(), build.surfaces);
    assert_eq!(scene.parent(&build.groups.master).unwrap(), None);
}

#[test]
fn missing_centerline_creates_nothing() {
    let mut scene = straight_scene();
    let before = scene.node_count();

    let err = build_road(&mut scene, "curve9", &RoadParameters::default()).unwrap_err();

    assert!(matches!(
        err,
        RoadbedError::Build(BuildError::MissingInput(ref name)) if name == "curve9"
    ));
    assert!(err.is_input_error());
    assert_eq!(scene.node_count(), before);
    assert_eq!(scene.edits().count(), 0);
}

#[test]
fn malformed_centerline_path_creates_nothing() {
    let mut scene = straight_scene();
    let before = scene.node_count();

    for path in ["curve1|", "curve1||", "||curve1"] {
        let err = build_road(&mut scene, path, &RoadParameters::default()).unwrap_err();
        assert!(matches!(
            err,
            RoadbedError::Build(BuildError::MissingInput(ref name)) if name == path
        ));
    }
    assert_eq!(scene.node_count(), before);
    assert_eq!(scene.edits().count(), 0);
}

#[test]
fn non_curve_centerline_creates_nothing() {
    let mut scene = straight_scene();
    scene.add_shaped("pCube1", "mesh");
    scene.add_transform("group1");
    let before = scene.node_count();

    for (node, found) in [("pCube1", "mesh"), ("group1", "transform")] {
        let err = build_road(&mut scene, node, &RoadParameters::default()).unwrap_err();
        match err {
            RoadbedError::Build(BuildError::InvalidInputType {
                node: ref n,
                found: ref f,
            }) => {
                assert_eq!(n, node);
                assert_eq!(f, found);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(scene.node_count(), before);
    assert_eq!(scene.edits().count(), 0);
}

#[test]
fn host_failure_aborts_and_keeps_partial_geometry() {
    let mut scene = straight_scene();
    let before = scene.node_count();
    scene.fail_after(SceneOp::Loft, 3);

    let err = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap_err();

    assert!(matches!(err, RoadbedError::Scene(SceneError::HostFailure(_))));
    assert!(!err.is_input_error());
    assert!(scene.node_count() > before);
    assert!(scene.exists("curve1_curbTop_R_crv"));
    assert!(scene.exists("curve1_drain_R_srf"));
    assert!(!scene.exists("curve1_curbWall_L_srf"));
    assert!(!scene.exists("curve1_roadCurves_GRP"));
}

#[test]
fn second_build_gets_suffixed_names() {
    let mut scene = straight_scene();
    let first = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();
    let second = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();

    assert_eq!(second.curves[0], "curve1_road_L_crv1");
    assert_eq!(second.groups.master, "curve1_roadSystem_GRP1");
    let overlap: HashSet<&String> = first.curves.iter().collect();
    assert!(second.curves.iter().all(|c| !overlap.contains(c)));
}

#[test]
fn centerline_inside_group_is_offset_in_world_space() {
    let mut scene = straight_scene();
    let group = scene.group(&["curve1".to_owned()], "roads").unwrap();
    scene
        .translate(&group, &roadbed::math::Vector3::new(0.0, 10.0, 0.0))
        .unwrap();

    let build = build_road(&mut scene, "|roads|curve1", &RoadParameters::default()).unwrap();

    assert_eq!(build.curves[0], "curve1_road_L_crv");
    let road_left = scene.world_curve("curve1_road_L_crv").unwrap();
    assert_relative_eq!(road_left.points()[0].y, 10.0, epsilon = 1e-12);
}
