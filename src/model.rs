//! Shared model core: axis resolution, interpolator construction and
//! clamped evaluation.
//!
//! The three instrument models are thin declarative shells around this
//! module; everything that is identical across instruments lives here.

use std::fmt;
use std::sync::Arc;

use crate::error::{EcfError, Result};
use crate::interp::BilinearSurface;
use crate::store::CalibrationPair;

/// Default hydrogen column density, cm⁻² (Galactic-absorption-only baseline).
pub const DEFAULT_NH: f64 = 3e20;

/// Default photon index of the assumed power law.
pub const DEFAULT_GAMMA: f64 = 1.7;

/// The tabulated grids store ECFs scaled down by this factor.
const ECF_SCALE: f64 = 1e11;

/// Spectral parameters for one ECF evaluation.
///
/// `Default` gives the standard Galactic-absorption-only baseline
/// (NH = 3×10²⁰ cm⁻², Γ = 1.7, no absorption correction); struct-update
/// syntax overrides any subset:
///
/// ```
/// use xray_ecf::EcfParams;
///
/// let params = EcfParams { nh: 5e21, gamma: 1.9, ..Default::default() };
/// assert!(!params.abscorr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcfParams {
    /// Hydrogen column density in cm⁻².
    pub nh: f64,
    /// Photon index of the power law.
    pub gamma: f64,
    /// Apply the Galactic absorption correction.
    pub abscorr: bool,
}

impl Default for EcfParams {
    fn default() -> Self {
        Self {
            nh: DEFAULT_NH,
            gamma: DEFAULT_GAMMA,
            abscorr: false,
        }
    }
}

/// An energy conversion factor in counts · cm² / erg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecf(f64);

impl Ecf {
    /// The factor in cm² / erg.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Ecf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8e} cm^2 / erg", self.0)
    }
}

/// Check a discrete axis value against its enumerated legal set.
pub(crate) fn resolve_axis<'a>(
    axis: &'static str,
    value: &'a str,
    legal: impl IntoIterator<Item = &'a str>,
) -> Result<&'a str> {
    if legal.into_iter().any(|v| v == value) {
        Ok(value)
    } else {
        Err(EcfError::UnknownConfiguration {
            axis,
            value: value.to_string(),
        })
    }
}

/// The built evaluation core of one configured model.
///
/// Both interpolation surfaces are sliced and built once at construction;
/// evaluation only clamps the inputs and samples the chosen surface, so it
/// is pure computation with no further table access.
#[derive(Debug)]
pub(crate) struct ModelCore {
    tables: Arc<CalibrationPair>,
    nocorr: BilinearSurface,
    abscorr: BilinearSurface,
}

impl ModelCore {
    /// Slice the two grids for a fully resolved configuration path and
    /// build the interpolation surfaces.
    pub fn build(tables: Arc<CalibrationPair>, path: &[&str]) -> Result<Self> {
        let nocorr = BilinearSurface::new(
            tables.lognh().to_vec(),
            tables.gamma().to_vec(),
            tables.nocorr_grid(path)?.clone(),
        );
        let abscorr = BilinearSurface::new(
            tables.lognh().to_vec(),
            tables.gamma().to_vec(),
            tables.abscorr_grid(path)?.clone(),
        );

        Ok(Self {
            tables,
            nocorr,
            abscorr,
        })
    }

    /// Evaluate the ECF at the given spectral parameters.
    ///
    /// `log10(NH)` and gamma are clamped to the tabulated ranges, so values
    /// outside the grid pin to the nearest boundary instead of failing. A
    /// non-finite spectrum (NaN gamma, or a non-positive NH whose log is
    /// NaN) yields a NaN factor rather than a lookup error.
    pub fn evaluate(&self, params: &EcfParams) -> Ecf {
        let lognh = params.nh.log10();
        let gamma = params.gamma;

        if lognh.is_nan() || gamma.is_nan() {
            return Ecf(f64::NAN);
        }

        // Keep lognh and gamma between the interpolation limits.
        let lognh_axis = self.tables.lognh();
        let gamma_axis = self.tables.gamma();

        let lognh = lognh.clamp(lognh_axis[0], *lognh_axis.last().unwrap());
        let gamma = gamma.clamp(gamma_axis[0], *gamma_axis.last().unwrap());

        let surface = if params.abscorr {
            &self.abscorr
        } else {
            &self.nocorr
        };

        Ecf(surface.eval(lognh, gamma) * ECF_SCALE)
    }

    /// The calibration tables backing this model (shared across all models
    /// of the same family constructed from the same store).
    #[cfg(test)]
    pub fn tables(&self) -> &Arc<CalibrationPair> {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = EcfParams::default();

        assert_eq!(params.nh, 3e20);
        assert_eq!(params.gamma, 1.7);
        assert!(!params.abscorr);
    }

    #[test]
    fn test_resolve_axis() {
        let legal = ["ff", "ef", "sw", "lw"];

        assert_eq!(resolve_axis("mode", "sw", legal).unwrap(), "sw");

        let err = resolve_axis("mode", "timing", legal).unwrap_err();
        match err {
            EcfError::UnknownConfiguration { axis, value } => {
                assert_eq!(axis, "mode");
                assert_eq!(value, "timing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ecf_display() {
        let ecf = Ecf(5.61893163e11);
        assert_eq!(format!("{ecf}"), "5.61893163e11 cm^2 / erg");
    }
}
