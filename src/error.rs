//! Error taxonomy for ECF calculation.
//!
//! Every variant reflects invalid input or a missing static asset; nothing
//! here is transient, so there are no retries anywhere in the crate.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while resolving a configuration or loading calibration data.
///
/// All variants surface synchronously at model construction (or on the first
/// calibration load); evaluation itself cannot fail. Out-of-range spectral
/// parameters at evaluation time are clamped, never rejected.
#[derive(Debug, Error)]
pub enum EcfError {
    /// The detector identifier does not match any enumerated detector.
    #[error("unknown detector: {0}")]
    UnknownDetector(String),

    /// A discrete configuration axis received a value outside its legal set.
    #[error("unknown {axis}: {value}")]
    UnknownConfiguration {
        /// Name of the offending axis ("mode", "grade", "filter", ...).
        axis: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The observation date falls outside every calibration epoch.
    #[error("date {date} is not compatible with the {instrument} mission")]
    DateOutOfRange {
        instrument: &'static str,
        date: NaiveDate,
    },

    /// A calibration asset is missing or malformed. Fatal: interpolation is
    /// impossible without the grids, so there is no degraded mode.
    #[error("calibration data for {instrument} unavailable: {reason}")]
    CalibrationDataUnavailable {
        instrument: &'static str,
        reason: String,
    },
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, EcfError>;
