//! # Sectra CLI Application
//!
//! Terminal front end for section_core. Loads a section descriptor (a JSON
//! file given as the first argument, or a built-in demo beam), prompts for
//! a design load, and prints the section check, a moment-curvature summary,
//! and the interaction envelope.
//!
//! Set `RUST_LOG=debug` to follow the solver iterations.

use std::io::{self, BufRead, Write};

use log::info;
use serde::Serialize;

use section_core::analysis::{
    self, check, CheckSectionInput, CheckSectionResult, InteractionResult, MomentCurvatureResult,
};
use section_core::geometry::FiberGeometry;
use section_core::{GeometryProperties, Section, SectionError, SectionResult, SolverSettings};

const DEMO_SECTION: &str = r#"{
    "materials": [
        { "name": "C40", "type": "Concrete", "variables": { "fc": 40.0e6 } },
        { "name": "B400", "type": "SteelIdeal", "variables": { "young": 200.0e9, "fy": 400.0e6 } }
    ],
    "geometries": [
        { "name": "web", "type": "RectSection", "material": "C40", "center": [0.0, 0.25],
          "variables": { "width": 0.3, "height": 0.5 } },
        { "name": "bar-left", "type": "Rebar", "material": "B400", "center": [-0.11, 0.04],
          "variables": { "diameter": 0.02 } },
        { "name": "bar-right", "type": "Rebar", "material": "B400", "center": [0.11, 0.04],
          "variables": { "diameter": 0.02 } }
    ]
}"#;

/// Everything the run computed, for JSON consumers
#[derive(Serialize)]
struct Report {
    properties: GeometryProperties,
    check: Result<CheckSectionResult, SectionError>,
    moment_curvature: Option<MomentCurvatureResult>,
    interaction: Option<InteractionResult>,
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn load_section() -> SectionResult<Section> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("loading section from {path}");
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SectionError::invalid_input("path", path.as_str(), e.to_string()))?;
            Section::from_json(&json)
        }
        None => {
            println!("No section file given, using the demo beam (300 x 500, 2 x Ø20).");
            Section::from_json(DEMO_SECTION)
        }
    }
}

fn main() {
    env_logger::init();

    println!("Sectra CLI - Fiber Section Analysis");
    println!("===================================");
    println!();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run() -> SectionResult<()> {
    let section = load_section()?;
    let properties = analysis::geometry_properties(&section)?;
    let settings = SolverSettings::default();

    println!();
    println!("Section:");
    println!("  Geometries: {}", section.geometries().len());
    println!("  Centroid:   ({:.4}, {:.4}) m", properties.centroid.x, properties.centroid.y);
    println!("  A_concrete: {:.4e} m²", properties.area_concrete);
    println!("  A_rebar:    {:.4e} m²", properties.area_rebar);
    println!("  A_tendon:   {:.4e} m²", properties.area_tendon);
    println!("  A_total:    {:.4e} m²", properties.total_area());
    println!("  Ratio:      {:.3} %", properties.reinforcement_ratio() * 100.0);
    for (i, geometry) in section.geometries().iter().enumerate() {
        println!(
            "  [{}] {:<12} {}",
            i,
            geometry.label().unwrap_or("-"),
            geometry.material().kind().display_name()
        );
    }
    println!();

    let normal_kn = prompt_f64("Enter axial force N (kN, tension +) [-2000.0]: ", -2000.0);
    let moment_knm = prompt_f64("Enter bending moment M (kNm, sagging +) [400.0]: ", 400.0);
    println!();

    let input = CheckSectionInput::new(normal_kn * 1.0e3, moment_knm * 1.0e3);
    let check = check::calculate(&section, &input, &settings);

    println!("═══════════════════════════════════════");
    println!("  SECTION CHECK");
    println!("═══════════════════════════════════════");
    match &check {
        Ok(result) => {
            let y_ref = properties.centroid.y;
            let (bottom, top) = section.extent()?;
            println!("  e0 = {:.6e}", result.plane.e0);
            println!("  k  = {:.6e} 1/m", result.plane.k);
            println!("  Top strain:    {:.6e}", result.plane.strain_at(top, y_ref));
            println!("  Bottom strain: {:.6e}", result.plane.strain_at(bottom, y_ref));
            println!("  Iterations:    {}", result.iterations);
            println!("  Equilibrium:   {}", status_icon(true));
        }
        Err(e) => {
            println!("  {} {}", status_icon(false), e);
        }
    }
    println!();

    let moment_curvature = match analysis::moment_curvature(&section, 0.02, input.target_normal) {
        Ok(curve) => {
            println!("Moment-curvature at N = {:.0} kN:", normal_kn);
            if let Some((k, m)) = curve.peak() {
                println!("  Peak moment: {:.1} kNm at k = {:.4e} 1/m", m / 1.0e3, k);
            }
            println!("  Points:      {}", curve.len());
            if let Some(reason) = &curve.termination {
                println!("  Stopped:     {}", reason);
            }
            Some(curve)
        }
        Err(e) => {
            println!("Moment-curvature: {} {}", status_icon(false), e);
            None
        }
    };
    println!();

    let interaction = match analysis::interaction_curve(&section, settings.interaction_points) {
        Ok(envelope) => {
            println!("Interaction envelope:");
            println!("  N range: {:.0} .. {:.0} kN", envelope.min_normal() / 1.0e3, envelope.max_normal() / 1.0e3);
            println!("  M range: {:.1} .. {:.1} kNm", envelope.min_moment() / 1.0e3, envelope.max_moment() / 1.0e3);
            Some(envelope)
        }
        Err(e) => {
            println!("Interaction envelope: {} {}", status_icon(false), e);
            None
        }
    };

    let report = Report {
        properties,
        check,
        moment_curvature,
        interaction,
    };
    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&report) {
        println!("{}", json);
    }
    Ok(())
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
