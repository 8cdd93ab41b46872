//! # Materials
//!
//! Uniaxial stress-strain laws for the section fibers. Every law is a pure,
//! path-independent function of strain: no history, no mutation after
//! construction. That purity lets a single material instance be shared by
//! any number of geometries and evaluated from any number of threads.
//!
//! ## Material Types
//!
//! - **Concrete**: parabola-rectangle law with softening, no tension
//! - **SteelIdeal**: elastic-perfectly-plastic, symmetric
//! - **SteelHardening**: bilinear with linear hardening, symmetric
//!
//! ## Example
//!
//! ```rust
//! use section_core::materials::{Concrete, Material, StressStrain};
//!
//! let concrete = Material::Concrete(Concrete::new(40.0e6).unwrap());
//!
//! // Compression is negative
//! assert_eq!(concrete.stress(-0.0035), -40.0e6);
//! // No tensile capacity
//! assert_eq!(concrete.stress(0.001), 0.0);
//! ```

pub mod concrete;
pub mod steel;

pub use concrete::Concrete;
pub use steel::{SteelHardening, SteelIdeal};

use concrete::ConcreteVariables;
use steel::{SteelHardeningVariables, SteelIdealVariables};

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// Capability shared by all constitutive laws.
///
/// Strain and stress follow the crate sign convention (tension positive).
/// Strength and strain-limit accessors return magnitudes.
pub trait StressStrain {
    /// Stress for the given strain. Total and continuous.
    fn stress(&self, strain: f64) -> f64;

    /// Slope of the active branch at the given strain.
    fn tangent(&self, strain: f64) -> f64;

    /// Largest compressive stress magnitude the law can develop
    fn peak_stress(&self) -> f64;

    /// Largest tensile stress the law can develop
    fn tensile_strength(&self) -> f64;

    /// Compressive strain magnitude at which the peak (or yield) is reached
    fn peak_strain(&self) -> f64;

    /// Compressive strain magnitude at the ultimate limit state
    fn ultimate_compressive_strain(&self) -> f64;

    /// Tensile strain at the ultimate limit state, `None` when the law has
    /// no tensile capacity
    fn ultimate_tensile_strain(&self) -> Option<f64>;

    /// Strain magnitude past which the stress no longer changes
    fn failure_strain(&self) -> f64;
}

/// Unified material enum.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Concrete", "variables": { "fc": 40.0e6 } }
/// { "type": "SteelIdeal", "variables": { "young": 200.0e9, "fy": 400.0e6 } }
/// { "type": "SteelHardening", "variables": { "young": 200.0e9, "fy": 1500.0e6, "ft": 1700.0e6 } }
/// ```
///
/// Deserializing validates the wrapped law, as [`Material::from_variables`]
/// does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "variables")]
pub enum Material {
    /// Concrete (no tension)
    Concrete(Concrete),
    /// Elastic-perfectly-plastic steel
    SteelIdeal(SteelIdeal),
    /// Steel with linear hardening
    SteelHardening(SteelHardening),
}

impl Material {
    /// Build a material from its type tag and JSON variables.
    ///
    /// Malformed variables and out-of-range parameters are rejected with
    /// an InvalidInput error naming `field`.
    pub fn from_variables(kind: MaterialKind, variables: serde_json::Value, field: &str) -> SectionResult<Self> {
        Ok(match kind {
            MaterialKind::Concrete => {
                Material::Concrete(parse_variables::<ConcreteVariables>(variables, field)?.try_into()?)
            }
            MaterialKind::SteelIdeal => {
                Material::SteelIdeal(parse_variables::<SteelIdealVariables>(variables, field)?.try_into()?)
            }
            MaterialKind::SteelHardening => {
                Material::SteelHardening(parse_variables::<SteelHardeningVariables>(variables, field)?.try_into()?)
            }
        })
    }

    /// Validate the parameters of the wrapped law
    pub fn validate(&self) -> SectionResult<()> {
        match self {
            Material::Concrete(m) => m.validate(),
            Material::SteelIdeal(m) => m.validate(),
            Material::SteelHardening(m) => m.validate(),
        }
    }

    /// Type tag of this material
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::Concrete(_) => MaterialKind::Concrete,
            Material::SteelIdeal(_) => MaterialKind::SteelIdeal,
            Material::SteelHardening(_) => MaterialKind::SteelHardening,
        }
    }

    fn law(&self) -> &dyn StressStrain {
        match self {
            Material::Concrete(m) => m,
            Material::SteelIdeal(m) => m,
            Material::SteelHardening(m) => m,
        }
    }
}

impl StressStrain for Material {
    fn stress(&self, strain: f64) -> f64 {
        self.law().stress(strain)
    }

    fn tangent(&self, strain: f64) -> f64 {
        self.law().tangent(strain)
    }

    fn peak_stress(&self) -> f64 {
        self.law().peak_stress()
    }

    fn tensile_strength(&self) -> f64 {
        self.law().tensile_strength()
    }

    fn peak_strain(&self) -> f64 {
        self.law().peak_strain()
    }

    fn ultimate_compressive_strain(&self) -> f64 {
        self.law().ultimate_compressive_strain()
    }

    fn ultimate_tensile_strain(&self) -> Option<f64> {
        self.law().ultimate_tensile_strain()
    }

    fn failure_strain(&self) -> f64 {
        self.law().failure_strain()
    }
}

/// Material type tags accepted in section descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Concrete,
    SteelIdeal,
    SteelHardening,
}

impl MaterialKind {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialKind::Concrete => "Concrete",
            MaterialKind::SteelIdeal => "Steel (elastic-plastic)",
            MaterialKind::SteelHardening => "Steel (hardening)",
        }
    }
}

pub(crate) fn parse_variables<T: serde::de::DeserializeOwned>(
    variables: serde_json::Value,
    field: &str,
) -> SectionResult<T> {
    let shown = variables.to_string();
    serde_json::from_value(variables)
        .map_err(|e| SectionError::invalid_input(field, shown, e.to_string()))
}
