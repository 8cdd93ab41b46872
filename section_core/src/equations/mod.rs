//! # Section Mechanics Equations
//!
//! Closed-form formulas shared by the fiber geometries and the solver.
//! Keeping them in one place documents the assumptions and the sign
//! convention once.
//!
//! ## Modules
//!
//! - [`section`] - Areas of the primitive fiber shapes
//! - [`strain`] - Plane-section kinematics (strain at a fiber, lever arms,
//!   strain planes through two prescribed fiber strains)
//!
//! ## Sign Conventions
//!
//! - **Strain / stress / axial force**: tension positive, compression negative
//! - **Position**: `y` grows upward; bending happens about a horizontal axis
//!   through the reference height `y_ref` (the section centroid)
//! - **Curvature**: positive curvature shortens the top fiber
//! - **Moment**: positive (sagging) moment compresses the top fiber
//!
//! With these conventions the local strain is `e0 + k * (y_ref - y)` and a
//! fiber force `dN` contributes `dN * (y_ref - y)` to the moment, so moment
//! and curvature always share a sign in the elastic range.
//!
//! ## References
//!
//! - EN 1992-1-1 §3.1.7 and §6.1: stress-strain relations and strain limits
//!   for section design
//! - "Reinforced Concrete: Mechanics and Design" by Wight & MacGregor, Ch. 5

pub mod section;
pub mod strain;

pub use section::{circular_area, rectangular_area};
pub use strain::{lever_arm, plane_through, strain_at};
