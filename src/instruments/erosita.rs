//! ECFs for the eROSITA instrument on-board the Spektr-RG mission.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::epoch::EpochTable;
use crate::error::Result;
use crate::model::{resolve_axis, Ecf, EcfParams, ModelCore};
use crate::store::CalibrationStore;

const INSTRUMENT: &str = "eROSITA";
const DEFAULT_EBAND: &str = "SOFT";
const DEFAULT_EPOCH: &str = "e1";

static EPOCHS: Lazy<EpochTable> =
    Lazy::new(|| EpochTable::from_literals(&[("e1", "2019-10-17", None)]));

/// ECF model for eROSITA, configured for one energy band and epoch.
///
/// ECFs were estimated assuming an absorbed power law; once a model is
/// built, factors can be evaluated for arbitrary NH and photon index, with
/// or without the Galactic absorption correction.
///
/// ```
/// use xray_ecf::{EcfParams, Erosita};
///
/// let model = Erosita::builder().eband("P3").build()?;
/// let ecf = model.ecf(EcfParams { nh: 5e21, gamma: 1.9, ..Default::default() });
/// assert!(ecf.value() > 0.0);
/// # Ok::<(), xray_ecf::EcfError>(())
/// ```
#[derive(Debug)]
pub struct Erosita {
    eband: String,
    epoch: &'static str,
    core: ModelCore,
}

impl Erosita {
    /// Energy bands and their bounds in keV: the eRASS1 catalogue bands,
    /// the upper-limit-server bands and the standard SOFT/HARD bands.
    pub const EBANDS: &'static [(&'static str, (f64, f64))] = &[
        ("1", (0.2, 2.3)),
        ("5", (0.5, 2.0)),
        ("P1", (0.2, 0.5)),
        ("P2", (0.5, 1.0)),
        ("P3", (1.0, 2.0)),
        ("P4", (2.0, 5.0)),
        ("P5", (5.0, 8.0)),
        ("P6", (4.0, 10.0)),
        ("P7", (5.1, 6.1)),
        ("P8", (6.2, 7.1)),
        ("P9", (7.2, 8.2)),
        ("021", (0.2, 0.6)),
        ("022", (0.6, 2.3)),
        ("023", (2.3, 5.0)),
        ("02e", (0.2, 5.0)),
        ("SOFT", (0.5, 2.0)),
        ("HARD", (2.0, 10.0)),
    ];

    /// The calibration epochs (a single one so far).
    pub fn epochs() -> &'static EpochTable {
        &EPOCHS
    }

    /// Start building a model; all axes have defaults.
    pub fn builder() -> ErositaBuilder<'static> {
        ErositaBuilder {
            eband: DEFAULT_EBAND.to_string(),
            date: None,
            store: None,
        }
    }

    /// Build a model for an energy band with the default epoch.
    pub fn new(eband: &str) -> Result<Self> {
        Self::builder().eband(eband).build()
    }

    /// Evaluate the ECF for the given spectral parameters.
    pub fn ecf(&self, params: EcfParams) -> Ecf {
        self.core.evaluate(&params)
    }

    /// The resolved energy band.
    pub fn eband(&self) -> &str {
        &self.eband
    }

    /// The resolved calibration epoch.
    pub fn epoch(&self) -> &str {
        self.epoch
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &ModelCore {
        &self.core
    }
}

/// Builder for [`Erosita`].
#[derive(Debug)]
pub struct ErositaBuilder<'a> {
    eband: String,
    date: Option<NaiveDate>,
    store: Option<&'a CalibrationStore>,
}

impl<'a> ErositaBuilder<'a> {
    /// Select the energy band (default `SOFT`).
    pub fn eband(mut self, eband: &str) -> Self {
        self.eband = eband.to_string();
        self
    }

    /// Select the calibration epoch by observation date.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Use an alternate calibration store instead of the shared one.
    pub fn store<'b>(self, store: &'b CalibrationStore) -> ErositaBuilder<'b> {
        ErositaBuilder {
            eband: self.eband,
            date: self.date,
            store: Some(store),
        }
    }

    /// Resolve the configuration, load (or reuse) the calibration tables
    /// and build the interpolators.
    pub fn build(self) -> Result<Erosita> {
        let eband =
            resolve_axis("energy band", &self.eband, Erosita::EBANDS.iter().map(|(n, _)| *n))?
                .to_string();
        let epoch = EPOCHS.select(INSTRUMENT, self.date, DEFAULT_EPOCH)?;

        let store = self.store.unwrap_or(CalibrationStore::shared());
        let core = ModelCore::build(store.erosita()?, &[epoch, &eband])?;

        log::debug!("configured {INSTRUMENT} model: eband={eband} epoch={epoch}");

        Ok(Erosita { eband, epoch, core })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::EcfError;

    #[test]
    fn test_defaults() {
        let model = Erosita::builder().build().unwrap();

        assert_eq!(model.eband(), "SOFT");
        assert_eq!(model.epoch(), "e1");
    }

    #[test]
    fn test_every_band_constructs() {
        for (band, _) in Erosita::EBANDS {
            let model = Erosita::new(band).unwrap();
            assert!(model.ecf(EcfParams::default()).value() > 0.0);
        }
    }

    #[test]
    fn test_unknown_band_is_rejected() {
        let err = Erosita::new("P99").unwrap_err();
        assert!(matches!(err, EcfError::UnknownConfiguration { axis, .. } if axis == "energy band"));
    }

    #[test]
    fn test_date_selects_epoch() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        let model = Erosita::builder().date(date).build().unwrap();
        assert_eq!(model.epoch(), "e1");
    }

    #[test]
    fn test_pre_launch_date_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let err = Erosita::builder().date(date).build().unwrap_err();
        assert!(matches!(err, EcfError::DateOutOfRange { .. }));
    }

    #[test]
    fn test_models_share_calibration_tables() {
        let a = Erosita::new("P3").unwrap();
        let b = Erosita::new("HARD").unwrap();

        assert!(Arc::ptr_eq(a.core().tables(), b.core().tables()));
    }
}
