//! Energy Conversion Factors (ECFs) for X-ray astronomy instruments.
//!
//! ECFs convert observed instrumental count rates into physical energy
//! flux. This crate ships precomputed ECF grids for eROSITA, Swift-XRT and
//! the XMM-Newton EPIC cameras, estimated assuming an absorbed power-law
//! spectrum, and evaluates them by bilinear interpolation over hydrogen
//! column density (NH) and photon index.
//!
//! A model is configured once for a discrete instrument configuration
//! (detector, filter, operation mode, energy band, event grades, whichever
//! apply) and a calibration epoch, then evaluated for arbitrary spectral
//! parameters. Returned ECFs are in counts · cm² / erg.
//!
//! ```
//! use xray_ecf::{EcfParams, XmmEpic};
//!
//! // pn camera, full-frame mode, Medium filter, 1-2 keV band.
//! let model = XmmEpic::builder("EPN", "Medium").eband("3").build()?;
//!
//! // An absorbed power law with NH = 5e21 cm^-2 and photon index 1.9.
//! let ecf = model.ecf(EcfParams { nh: 5e21, gamma: 1.9, ..Default::default() });
//! println!("{ecf}");
//!
//! // The same spectrum, corrected for Galactic absorption.
//! let corrected = model.ecf(EcfParams { nh: 5e21, gamma: 1.9, abscorr: true });
//! assert!(corrected.value() < ecf.value());
//! # Ok::<(), xray_ecf::EcfError>(())
//! ```
//!
//! Calibration tables load lazily, at most once per instrument family, and
//! are shared read-only between all models; constructing many models for
//! one family is cheap after the first. Evaluation never fails: spectral
//! parameters outside the tabulated grid clamp to the nearest boundary,
//! and a NaN parameter (or a negative NH) propagates as a NaN factor.

mod epoch;
mod error;
mod instruments;
mod interp;
mod model;
mod store;
mod table;

pub use epoch::{EpochInterval, EpochTable};
pub use error::{EcfError, Result};
pub use instruments::{
    Erosita, ErositaBuilder, SwiftXrt, SwiftXrtBuilder, XmmDetector, XmmDetectorFamily, XmmEpic,
    XmmEpicBuilder,
};
pub use model::{Ecf, EcfParams, DEFAULT_GAMMA, DEFAULT_NH};
pub use store::CalibrationStore;
