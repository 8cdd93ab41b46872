//! Reinforcing and prestressing steel
//!
//! Both laws are symmetric in tension and compression:
//!
//! ```text
//!   σ ▲            SteelIdeal              SteelHardening
//!  ft │                                      ┌───────
//!  fy │      ┌────────────            ┌─────╯
//!     │     ╱                         ╱
//!     │    ╱                         ╱
//!     └───┴────────────▶ ε        └───┴──────┬───────▶ ε
//!        εy                           εy     εu
//! ```
//!
//! Beyond the ultimate strain the stress saturates instead of dropping, so
//! the law stays total over the strain range the solver explores. The
//! ultimate strain is used for limit states only.

use serde::{Deserialize, Serialize};

use super::StressStrain;
use crate::errors::{require_positive, SectionError, SectionResult};

fn default_ideal_ultimate_strain() -> f64 {
    0.01
}

fn default_hardening_ultimate_strain() -> f64 {
    0.035
}

/// Elastic-perfectly-plastic steel.
///
/// ## JSON Example
///
/// ```json
/// { "young": 200.0e9, "fy": 400.0e6, "ultimate_strain": 0.01 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SteelIdealVariables")]
pub struct SteelIdeal {
    /// Young's modulus (Pa)
    pub young: f64,

    /// Yield stress (Pa)
    pub fy: f64,

    /// Ultimate strain (limit states only)
    pub ultimate_strain: f64,
}

/// Unchecked descriptor variables of a [`SteelIdeal`].
#[derive(Debug, Deserialize)]
pub struct SteelIdealVariables {
    young: f64,
    fy: f64,
    #[serde(default = "default_ideal_ultimate_strain")]
    ultimate_strain: f64,
}

impl TryFrom<SteelIdealVariables> for SteelIdeal {
    type Error = SectionError;

    fn try_from(v: SteelIdealVariables) -> SectionResult<Self> {
        let steel = SteelIdeal {
            young: v.young,
            fy: v.fy,
            ultimate_strain: v.ultimate_strain,
        };
        steel.validate()?;
        Ok(steel)
    }
}

impl SteelIdeal {
    /// Steel with the default ultimate strain of 1%.
    pub fn new(young: f64, fy: f64) -> SectionResult<Self> {
        let steel = SteelIdeal {
            young,
            fy,
            ultimate_strain: default_ideal_ultimate_strain(),
        };
        steel.validate()?;
        Ok(steel)
    }

    /// Override the ultimate strain.
    pub fn with_ultimate_strain(mut self, ultimate_strain: f64) -> SectionResult<Self> {
        self.ultimate_strain = ultimate_strain;
        self.validate()?;
        Ok(self)
    }

    /// Yield strain fy / E
    pub fn yield_strain(&self) -> f64 {
        self.fy / self.young
    }

    /// Validate the law parameters.
    pub fn validate(&self) -> SectionResult<()> {
        require_positive("young", self.young)?;
        require_positive("fy", self.fy)?;
        require_positive("ultimate_strain", self.ultimate_strain)?;
        if self.ultimate_strain <= self.yield_strain() {
            return Err(SectionError::invalid_input(
                "ultimate_strain",
                self.ultimate_strain.to_string(),
                "Ultimate strain must exceed the yield strain",
            ));
        }
        Ok(())
    }
}

impl StressStrain for SteelIdeal {
    fn stress(&self, strain: f64) -> f64 {
        (self.young * strain).clamp(-self.fy, self.fy)
    }

    fn tangent(&self, strain: f64) -> f64 {
        if strain.abs() < self.yield_strain() {
            self.young
        } else {
            0.0
        }
    }

    fn peak_stress(&self) -> f64 {
        self.fy
    }

    fn tensile_strength(&self) -> f64 {
        self.fy
    }

    fn peak_strain(&self) -> f64 {
        self.yield_strain()
    }

    fn ultimate_compressive_strain(&self) -> f64 {
        self.ultimate_strain
    }

    fn ultimate_tensile_strain(&self) -> Option<f64> {
        Some(self.ultimate_strain)
    }

    fn failure_strain(&self) -> f64 {
        self.ultimate_strain
    }
}

/// Bilinear steel with linear hardening from `fy` to `ft`.
///
/// ## JSON Example
///
/// ```json
/// { "young": 200.0e9, "fy": 1500.0e6, "ft": 1700.0e6, "ultimate_strain": 0.035 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SteelHardeningVariables")]
pub struct SteelHardening {
    /// Young's modulus (Pa)
    pub young: f64,

    /// Yield stress (Pa)
    pub fy: f64,

    /// Tensile strength reached at the ultimate strain (Pa)
    pub ft: f64,

    /// Strain at which `ft` is reached
    pub ultimate_strain: f64,
}

/// Unchecked descriptor variables of a [`SteelHardening`].
#[derive(Debug, Deserialize)]
pub struct SteelHardeningVariables {
    young: f64,
    fy: f64,
    ft: f64,
    #[serde(default = "default_hardening_ultimate_strain")]
    ultimate_strain: f64,
}

impl TryFrom<SteelHardeningVariables> for SteelHardening {
    type Error = SectionError;

    fn try_from(v: SteelHardeningVariables) -> SectionResult<Self> {
        SteelHardening::new(v.young, v.fy, v.ft, v.ultimate_strain)
    }
}

impl SteelHardening {
    /// Hardening steel reaching `ft` at `ultimate_strain`.
    pub fn new(young: f64, fy: f64, ft: f64, ultimate_strain: f64) -> SectionResult<Self> {
        let steel = SteelHardening {
            young,
            fy,
            ft,
            ultimate_strain,
        };
        steel.validate()?;
        Ok(steel)
    }

    /// Yield strain fy / E
    pub fn yield_strain(&self) -> f64 {
        self.fy / self.young
    }

    /// Secondary modulus between yield and ultimate
    pub fn hardening_modulus(&self) -> f64 {
        (self.ft - self.fy) / (self.ultimate_strain - self.yield_strain())
    }

    /// Validate the law parameters.
    pub fn validate(&self) -> SectionResult<()> {
        require_positive("young", self.young)?;
        require_positive("fy", self.fy)?;
        require_positive("ft", self.ft)?;
        require_positive("ultimate_strain", self.ultimate_strain)?;
        if self.ft < self.fy {
            return Err(SectionError::invalid_input(
                "ft",
                self.ft.to_string(),
                "Tensile strength must not be smaller than the yield stress",
            ));
        }
        if self.ultimate_strain <= self.yield_strain() {
            return Err(SectionError::invalid_input(
                "ultimate_strain",
                self.ultimate_strain.to_string(),
                "Ultimate strain must exceed the yield strain",
            ));
        }
        Ok(())
    }
}

impl StressStrain for SteelHardening {
    fn stress(&self, strain: f64) -> f64 {
        let magnitude = strain.abs();
        let ey = self.yield_strain();
        let value = if magnitude <= ey {
            self.young * magnitude
        } else if magnitude <= self.ultimate_strain {
            self.fy + self.hardening_modulus() * (magnitude - ey)
        } else {
            self.ft
        };
        value.copysign(strain)
    }

    fn tangent(&self, strain: f64) -> f64 {
        let magnitude = strain.abs();
        if magnitude < self.yield_strain() {
            self.young
        } else if magnitude < self.ultimate_strain {
            self.hardening_modulus()
        } else {
            0.0
        }
    }

    fn peak_stress(&self) -> f64 {
        self.ft
    }

    fn tensile_strength(&self) -> f64 {
        self.ft
    }

    fn peak_strain(&self) -> f64 {
        self.yield_strain()
    }

    fn ultimate_compressive_strain(&self) -> f64 {
        self.ultimate_strain
    }

    fn ultimate_tensile_strain(&self) -> Option<f64> {
        Some(self.ultimate_strain)
    }

    fn failure_strain(&self) -> f64 {
        self.ultimate_strain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_elastic_and_plastic() {
        let steel = SteelIdeal::new(200.0e9, 400.0e6).unwrap();
        assert!((steel.stress(0.001) - 200.0e6).abs() < 1e-6);
        assert!((steel.stress(-0.001) + 200.0e6).abs() < 1e-6);
        assert_eq!(steel.stress(0.005), 400.0e6);
        assert_eq!(steel.stress(-0.5), -400.0e6);
        assert_eq!(steel.stress(0.0), 0.0);
        assert_eq!(steel.tangent(0.001), 200.0e9);
        assert_eq!(steel.tangent(0.003), 0.0);
    }

    #[test]
    fn test_ideal_is_continuous_at_yield() {
        let steel = SteelIdeal::new(200.0e9, 400.0e6).unwrap();
        let ey = steel.yield_strain();
        assert!((steel.stress(ey * (1.0 - 1e-9)) - steel.stress(ey * (1.0 + 1e-9))).abs() < 1.0);
    }

    #[test]
    fn test_hardening_branch() {
        let steel = SteelHardening::new(200.0e9, 1500.0e6, 1700.0e6, 0.035).unwrap();
        let ey = steel.yield_strain();
        assert!((ey - 0.0075).abs() < 1e-15);
        assert!((steel.stress(ey) - 1500.0e6).abs() < 1e-3);
        assert!((steel.stress(0.035) - 1700.0e6).abs() < 1e-3);
        assert!((steel.stress(-0.035) + 1700.0e6).abs() < 1e-3);
        // Saturates past the ultimate strain
        assert_eq!(steel.stress(0.2), 1700.0e6);
        let mid = 0.5 * (ey + 0.035);
        assert!((steel.stress(mid) - 1600.0e6).abs() < 1e-3);
        assert!((steel.tangent(mid) - steel.hardening_modulus()).abs() < 1e-6);
    }

    #[test]
    fn test_hardening_without_gain_behaves_like_ideal() {
        let hardening = SteelHardening::new(200.0e9, 400.0e6, 400.0e6, 0.01).unwrap();
        let ideal = SteelIdeal::new(200.0e9, 400.0e6).unwrap();
        for strain in [-0.02, -0.004, -0.001, 0.0, 0.0015, 0.008] {
            assert!((hardening.stress(strain) - ideal.stress(strain)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SteelIdeal::new(0.0, 400.0e6).is_err());
        assert!(SteelIdeal::new(200.0e9, -1.0).is_err());
        assert!(SteelIdeal::new(200.0e9, 500.0e6)
            .unwrap()
            .with_ultimate_strain(0.001)
            .is_err());
        assert!(SteelHardening::new(200.0e9, 500.0e6, 450.0e6, 0.05).is_err());
        assert!(SteelHardening::new(200.0e9, 500.0e6, 550.0e6, 0.002).is_err());
    }

    #[test]
    fn test_json_variables() {
        let steel: SteelIdeal =
            serde_json::from_str(r#"{"young": 210.0e9, "fy": 500.0e6}"#).unwrap();
        assert_eq!(steel.ultimate_strain, 0.01);
        let strand: SteelHardening = serde_json::from_str(
            r#"{"young": 200.0e9, "fy": 1500.0e6, "ft": 1700.0e6, "ultimate_strain": 0.035}"#,
        )
        .unwrap();
        assert!(strand.validate().is_ok());
        assert_eq!(strand.failure_strain(), 0.035);
    }

    #[test]
    fn test_json_is_validated() {
        assert!(serde_json::from_str::<SteelIdeal>(r#"{"young": 200.0e9, "fy": 0.0}"#).is_err());
        assert!(serde_json::from_str::<SteelIdeal>(
            r#"{"young": 200.0e9, "fy": 400.0e6, "ultimate_strain": 0.001}"#
        )
        .is_err());
        assert!(serde_json::from_str::<SteelHardening>(
            r#"{"young": 200.0e9, "fy": 500.0e6, "ft": 450.0e6}"#
        )
        .is_err());
    }
}
