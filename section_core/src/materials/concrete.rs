//! Concrete in compression
//!
//! Parabola-rectangle law (EN 1992-1-1 §3.1.7) extended with a softening
//! tail so the curve stays total for any strain the solver tries:
//!
//! ```text
//!  -σ ▲
//!  fc │      ┌──────────────┐
//!     │    ╱                 ╲
//!     │  ╱                     ╲
//!     │╱                         ╲
//!     └──────┬──────┬───────┬─────┴──────▶ -ε
//!          εc2    εcu    εsoft  εcrush
//! ```
//!
//! Tension carries no stress. All strain parameters are magnitudes.

use serde::{Deserialize, Serialize};

use super::StressStrain;
use crate::errors::{require_positive, SectionError, SectionResult};

fn default_eps_c2() -> f64 {
    0.002
}

fn default_eps_cu() -> f64 {
    0.0035
}

fn default_softening_strain() -> f64 {
    0.007
}

fn default_crushing_strain() -> f64 {
    0.014
}

/// Concrete stress-strain law.
///
/// ## JSON Example
///
/// ```json
/// { "fc": 40.0e6 }
/// ```
///
/// Only `fc` is required; the strain limits default to the EN 1992 values
/// for normal-strength concrete. Deserialized values are validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConcreteVariables")]
pub struct Concrete {
    /// Compressive strength (Pa, positive)
    pub fc: f64,

    /// Strain at peak stress
    pub eps_c2: f64,

    /// Ultimate strain used for limit states
    pub eps_cu: f64,

    /// Strain at which softening begins
    pub softening_strain: f64,

    /// Strain at which the stress has dropped to zero
    pub crushing_strain: f64,
}

/// Unchecked descriptor variables of a [`Concrete`].
#[derive(Debug, Deserialize)]
pub struct ConcreteVariables {
    fc: f64,
    #[serde(default = "default_eps_c2")]
    eps_c2: f64,
    #[serde(default = "default_eps_cu")]
    eps_cu: f64,
    #[serde(default = "default_softening_strain")]
    softening_strain: f64,
    #[serde(default = "default_crushing_strain")]
    crushing_strain: f64,
}

impl TryFrom<ConcreteVariables> for Concrete {
    type Error = SectionError;

    fn try_from(v: ConcreteVariables) -> SectionResult<Self> {
        let concrete = Concrete {
            fc: v.fc,
            eps_c2: v.eps_c2,
            eps_cu: v.eps_cu,
            softening_strain: v.softening_strain,
            crushing_strain: v.crushing_strain,
        };
        concrete.validate()?;
        Ok(concrete)
    }
}

impl Concrete {
    /// Concrete with strength `fc` and default strain limits.
    pub fn new(fc: f64) -> SectionResult<Self> {
        let concrete = Concrete {
            fc,
            eps_c2: default_eps_c2(),
            eps_cu: default_eps_cu(),
            softening_strain: default_softening_strain(),
            crushing_strain: default_crushing_strain(),
        };
        concrete.validate()?;
        Ok(concrete)
    }

    /// Validate the law parameters.
    pub fn validate(&self) -> SectionResult<()> {
        require_positive("fc", self.fc)?;
        require_positive("eps_c2", self.eps_c2)?;
        require_positive("eps_cu", self.eps_cu)?;
        if self.eps_cu < self.eps_c2 {
            return Err(SectionError::invalid_input(
                "eps_cu",
                self.eps_cu.to_string(),
                "Ultimate strain must not be smaller than the peak strain",
            ));
        }
        if !(self.softening_strain >= self.eps_cu) {
            return Err(SectionError::invalid_input(
                "softening_strain",
                self.softening_strain.to_string(),
                "Softening must start at or beyond the ultimate strain",
            ));
        }
        if !(self.crushing_strain > self.softening_strain) || !self.crushing_strain.is_finite() {
            return Err(SectionError::invalid_input(
                "crushing_strain",
                self.crushing_strain.to_string(),
                "Crushing strain must exceed the softening strain",
            ));
        }
        Ok(())
    }
}

impl StressStrain for Concrete {
    fn stress(&self, strain: f64) -> f64 {
        let c = -strain;
        if !(c > 0.0) {
            0.0
        } else if c <= self.eps_c2 {
            let r = c / self.eps_c2;
            -self.fc * (2.0 * r - r * r)
        } else if c <= self.softening_strain {
            -self.fc
        } else if c < self.crushing_strain {
            -self.fc * (self.crushing_strain - c) / (self.crushing_strain - self.softening_strain)
        } else {
            0.0
        }
    }

    fn tangent(&self, strain: f64) -> f64 {
        let c = -strain;
        if !(c > 0.0) {
            0.0
        } else if c <= self.eps_c2 {
            2.0 * self.fc * (1.0 - c / self.eps_c2) / self.eps_c2
        } else if c <= self.softening_strain {
            0.0
        } else if c < self.crushing_strain {
            -self.fc / (self.crushing_strain - self.softening_strain)
        } else {
            0.0
        }
    }

    fn peak_stress(&self) -> f64 {
        self.fc
    }

    fn tensile_strength(&self) -> f64 {
        0.0
    }

    fn peak_strain(&self) -> f64 {
        self.eps_c2
    }

    fn ultimate_compressive_strain(&self) -> f64 {
        self.eps_cu
    }

    fn ultimate_tensile_strain(&self) -> Option<f64> {
        None
    }

    fn failure_strain(&self) -> f64 {
        self.crushing_strain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c40() -> Concrete {
        Concrete::new(40.0e6).unwrap()
    }

    #[test]
    fn test_no_tension() {
        let concrete = c40();
        for strain in [1.0e-9, 1.0e-5, 1.0e-3, 0.01, 0.5, 1.0e3] {
            assert_eq!(concrete.stress(strain), 0.0);
            assert_eq!(concrete.tangent(strain), 0.0);
        }
        assert_eq!(concrete.stress(0.0), 0.0);
    }

    #[test]
    fn test_peak_and_plateau() {
        let concrete = c40();
        assert!((concrete.stress(-0.002) + 40.0e6).abs() < 1e-6);
        assert_eq!(concrete.stress(-0.0035), -40.0e6);
        assert_eq!(concrete.stress(-0.007), -40.0e6);
        // Halfway up the parabola: 2(0.5) - 0.25 = 0.75
        assert!((concrete.stress(-0.001) + 30.0e6).abs() < 1e-6);
    }

    #[test]
    fn test_softening_is_continuous_and_floors_at_zero() {
        let concrete = c40();
        let just_before = concrete.stress(-0.007 + 1e-12);
        let just_after = concrete.stress(-0.007 - 1e-12);
        assert!((just_before - just_after).abs() < 1.0);
        assert!((concrete.stress(-0.0105) + 20.0e6).abs() < 1e-3);
        assert_eq!(concrete.stress(-0.014), 0.0);
        assert_eq!(concrete.stress(-1.0), 0.0);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let concrete = c40();
        let h = 1.0e-9;
        for strain in [-0.0005, -0.0015, -0.004, -0.009] {
            let fd = (concrete.stress(strain + h) - concrete.stress(strain - h)) / (2.0 * h);
            let tangent = concrete.tangent(strain);
            assert!((fd - tangent).abs() <= 1.0e-4 * tangent.abs().max(1.0e6));
        }
        // Initial modulus 2 fc / eps_c2
        assert!((concrete.tangent(-1.0e-12) - 4.0e10).abs() < 1.0e3);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Concrete::new(0.0).is_err());
        assert!(Concrete::new(-25.0e6).is_err());
        let mut concrete = c40();
        concrete.eps_cu = 0.001;
        assert!(concrete.validate().is_err());
        let mut concrete = c40();
        concrete.crushing_strain = concrete.softening_strain;
        assert!(concrete.validate().is_err());
    }

    #[test]
    fn test_defaults_from_json() {
        let concrete: Concrete = serde_json::from_str(r#"{"fc": 25.0e6}"#).unwrap();
        assert_eq!(concrete.eps_cu, 0.0035);
        assert_eq!(concrete.eps_c2, 0.002);
        assert!(concrete.validate().is_ok());
        assert_eq!(concrete.failure_strain(), 0.014);
    }

    #[test]
    fn test_json_is_validated() {
        assert!(serde_json::from_str::<Concrete>(r#"{"fc": -40.0e6}"#).is_err());
        assert!(serde_json::from_str::<Concrete>(r#"{"fc": 40.0e6, "crushing_strain": 0.005}"#).is_err());
    }
}
