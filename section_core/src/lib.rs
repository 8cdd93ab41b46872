//! # section_core - Nonlinear Fiber Section Analysis
//!
//! `section_core` computes the response of reinforced and prestressed
//! concrete cross-sections under combined axial force and uniaxial bending.
//! A section is a set of fiber geometries (concrete blocks, bars, tendons)
//! with nonlinear stress-strain laws; analyses search for the plane strain
//! state that balances a load or trace the section to its limit states.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: sections are immutable; analyses are pure functions
//! - **JSON-First**: descriptors, results, and errors implement Serialize/Deserialize
//! - **Rich Errors**: invalid input, instability, and non-convergence are distinct
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use section_core::analysis;
//! use section_core::geometry::{Rebar, RectSection};
//! use section_core::materials::{Concrete, Material, SteelIdeal};
//! use section_core::section::Section;
//!
//! let concrete = Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()));
//! let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
//! let section = Section::new(vec![
//!     RectSection::new(concrete, [0.0, 0.25], 0.3, 0.5).unwrap().into(),
//!     Rebar::new(Arc::clone(&steel), [-0.11, 0.04], 0.02).unwrap().into(),
//!     Rebar::new(steel, [0.11, 0.04], 0.02).unwrap().into(),
//! ]);
//!
//! let curve = analysis::moment_curvature(&section, 0.01, -1.0e6).unwrap();
//! assert_eq!(curve.len(), 51);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Stress-strain laws
//! - [`geometry`] - Fiber geometries and their integration
//! - [`section`] - Section assembly, centroid, and force integration
//! - [`input`] - JSON section descriptors
//! - [`analysis`] - Section check, moment-curvature, interaction envelope
//! - [`settings`] - Solver controls
//! - [`equations`] - Shared formulas and the sign convention
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod equations;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod materials;
pub mod section;
pub mod settings;
pub mod state;

// Re-export commonly used types at crate root for convenience
pub use errors::{ErrorKind, SectionError, SectionResult};
pub use input::SectionInput;
pub use section::{Centroid, GeometryProperties, Section};
pub use settings::SolverSettings;
pub use state::{SectionForces, StrainPlane};
