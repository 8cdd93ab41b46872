//! End-to-end checks on a doubly-symmetric reinforced concrete beam.

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use section_core::analysis::{self, check, CheckSectionInput};
use section_core::geometry::{Rebar, RectSection, Tendon};
use section_core::materials::{Concrete, Material, SteelHardening, SteelIdeal};
use section_core::{Section, SectionError, SolverSettings, StrainPlane};

const BEAM_JSON: &str = r#"{
    "materials": [
        { "name": "C40", "type": "Concrete", "variables": { "fc": 40.0e6 } },
        { "name": "B400", "type": "SteelIdeal", "variables": { "young": 200.0e9, "fy": 400.0e6 } }
    ],
    "geometries": [
        { "name": "web", "type": "RectSection", "material": "C40", "center": [0.0, 0.25],
          "variables": { "width": 0.3, "height": 0.5 } },
        { "name": "left", "type": "Rebar", "material": "B400", "center": [-0.11, 0.04],
          "variables": { "diameter": 0.02 } },
        { "name": "right", "type": "Rebar", "material": "B400", "center": [0.11, 0.04],
          "variables": { "diameter": 0.02 } }
    ]
}"#;

fn beam() -> Section {
    Section::from_json(BEAM_JSON).unwrap()
}

#[test]
fn test_reference_check_converges_and_roundtrips() {
    let section = beam();
    let plane = analysis::check_section(&section, -2.0e6, 4.0e5, 50).unwrap();
    let forces = section.evaluate(&plane).unwrap();
    assert_abs_diff_eq!(forces.normal, -2.0e6, epsilon = 10.0);
    assert_abs_diff_eq!(forces.moment, 4.0e5, epsilon = 5.0);

    // Top compressed beyond the peak strain, bars well into yield
    let y_ref = section.centroid().unwrap().y;
    assert!(plane.k > 0.0);
    assert!(plane.strain_at(0.5, y_ref) < -0.002);
    assert!(plane.strain_at(0.04, y_ref) > 0.002);
}

#[test]
fn test_check_reports_iterations_and_residuals() {
    let section = beam();
    let result = check::calculate(&section, &CheckSectionInput::new(-2.0e6, 4.0e5), &SolverSettings::default()).unwrap();
    assert!(result.iterations > 0 && result.iterations <= 50);
    assert!(result.residual_normal.abs() < 10.0);
    assert!(result.residual_moment.abs() < 5.0);
}

#[test]
fn test_json_and_builder_sections_agree() {
    let concrete = Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()));
    let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
    let built = Section::new(vec![
        RectSection::new(concrete, [0.0, 0.25], 0.3, 0.5).unwrap().with_label("web").into(),
        Rebar::new(Arc::clone(&steel), [-0.11, 0.04], 0.02).unwrap().with_label("left").into(),
        Rebar::new(steel, [0.11, 0.04], 0.02).unwrap().with_label("right").into(),
    ]);
    assert_eq!(built, beam());
}

#[test]
fn test_geometry_properties() {
    let properties = analysis::geometry_properties(&beam()).unwrap();
    assert_relative_eq!(properties.area_rebar, 2.0 * std::f64::consts::PI * 0.01 * 0.01, max_relative = 1e-12);
    assert_relative_eq!(properties.area_concrete, 0.15, max_relative = 1e-12);
    assert_eq!(properties.area_tendon, 0.0);
    assert!(properties.centroid.y < 0.25);
    assert_abs_diff_eq!(properties.centroid.x, 0.0, epsilon = 1e-12);
}

#[test]
fn test_empty_section_is_unstable_everywhere() {
    let section = Section::new(Vec::new());
    let unstable = |e: SectionError| e.error_code() == "SECTION_UNSTABLE";
    assert!(unstable(analysis::geometry_properties(&section).unwrap_err()));
    assert!(unstable(analysis::check_section(&section, 0.0, 0.0, 50).unwrap_err()));
    assert!(unstable(analysis::moment_curvature(&section, 0.01, 0.0).unwrap_err()));
    assert!(unstable(analysis::interaction_curve(&section, 50).unwrap_err()));
    assert!(unstable(section.evaluate(&StrainPlane::default()).unwrap_err()));
}

#[test]
fn test_moment_curvature_origin() {
    let curve = analysis::moment_curvature(&beam(), 0.0, 0.0).unwrap();
    assert_eq!(curve.len(), 1);
    assert_eq!(curve.curvature[0], 0.0);
    assert_abs_diff_eq!(curve.moment[0], 0.0, epsilon = 1e-6);
}

#[test]
fn test_moment_curvature_point_count() {
    let section = beam();
    for k_max in [0.002, 0.005, 0.0125] {
        let curve = analysis::moment_curvature(&section, k_max, -2.0e6).unwrap();
        assert!(curve.is_complete());
        assert_eq!(curve.len(), 51);
        assert_eq!(curve.axial_strain.len(), 51);
    }
}

#[test]
fn test_moment_curvature_matches_check_section() {
    let section = beam();
    let curve = analysis::moment_curvature(&section, 0.004, -1.0e6).unwrap();
    let (k, m) = curve.points().nth(25).unwrap();
    let plane = analysis::check_section(&section, -1.0e6, m, 50).unwrap();
    assert_relative_eq!(plane.k, k, max_relative = 1e-3);
    assert_relative_eq!(plane.e0, curve.axial_strain[25], max_relative = 1e-3);
}

#[test]
fn test_envelope_contains_checked_load() {
    let section = beam();
    let envelope = analysis::interaction_curve(&section, 60).unwrap();
    assert_eq!(envelope.len(), 60);
    assert!(envelope.max_moment() > 4.0e5);
    assert!(envelope.min_normal() < -6.0e6);
    assert!(envelope.max_normal() > 2.0e5);
}

#[test]
fn test_loads_beyond_envelope_are_unstable() {
    let section = beam();
    let envelope = analysis::interaction_curve(&section, 61).unwrap();
    let err = analysis::check_section(&section, -2.0e6, 6.0e5, 50).unwrap_err();
    assert_eq!(err.error_code(), "SECTION_UNSTABLE");

    // Points of the envelope with a substantial moment, pushed outward
    let bending: Vec<_> = envelope.points().filter(|(_, m)| m.abs() >= 1.0e5).collect();
    assert!(bending.len() > 20);
    for factor in [1.3, 2.0, 5.0] {
        for &(n, m) in &bending {
            let err = analysis::check_section(&section, n, m * factor, 50).unwrap_err();
            assert!(
                matches!(err, SectionError::SectionUnstable { .. }),
                "N = {n}, M = {} gave {err}",
                m * factor
            );
        }
    }
}

#[test]
fn test_evaluation_is_deterministic_across_threads() {
    let section = beam();
    let plane = StrainPlane::new(2.6e-4, 0.0147);
    let expected = section.evaluate(&plane).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| section.evaluate(&plane).unwrap())).collect();
        for handle in handles {
            let forces = handle.join().unwrap();
            assert_eq!(forces.normal.to_bits(), expected.normal.to_bits());
            assert_eq!(forces.moment.to_bits(), expected.moment.to_bits());
        }
    });
}

#[test]
fn test_prestressed_section() {
    let concrete = Arc::new(Material::Concrete(Concrete::new(50.0e6).unwrap()));
    let strand = Arc::new(Material::SteelHardening(
        SteelHardening::new(195.0e9, 1500.0e6, 1770.0e6, 0.035).unwrap(),
    ));
    let section = Section::new(vec![
        RectSection::new(concrete, [0.0, 0.3], 0.3, 0.6).unwrap().into(),
        Tendon::new(strand, [0.0, 0.08], 0.015, 0.006).unwrap().into(),
    ]);

    // Under prestress alone the eccentric tendon cambers the beam upward
    // and compresses the bottom fiber
    let settings = SolverSettings::default().with_max_iterations(100);
    let input = CheckSectionInput::new(0.0, 0.0);
    let result = check::calculate(&section, &input, &settings).unwrap();
    let y_ref = section.centroid().unwrap().y;
    assert!(result.plane.k < 0.0);
    assert!(result.plane.strain_at(0.0, y_ref) < 0.0);
    assert!(result.plane.strain_at(0.08, y_ref) < 0.0);

    let properties = section.geometry_properties().unwrap();
    assert_relative_eq!(properties.area_tendon, std::f64::consts::PI * 0.015 * 0.015 / 4.0, max_relative = 1e-12);
}
