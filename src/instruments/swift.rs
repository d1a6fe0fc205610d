//! ECFs for the XRT instrument on-board the Swift telescope.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::epoch::EpochTable;
use crate::error::Result;
use crate::model::{resolve_axis, Ecf, EcfParams, ModelCore};
use crate::store::CalibrationStore;

const INSTRUMENT: &str = "Swift-XRT";
const DEFAULT_GRADE: &str = "0";
const DEFAULT_EBAND: &str = "SOFT";
const DEFAULT_EPOCH: &str = "e6";

// Epoch boundaries from the Swift-XRT CALDB release history.
static EPOCHS: Lazy<EpochTable> = Lazy::new(|| {
    EpochTable::from_literals(&[
        ("e1", "2004-12-01", Some("2007-01-01")),
        ("e2", "2007-01-01", Some("2007-08-31")),
        ("e3", "2007-08-31", Some("2009-01-01")),
        ("e4", "2009-01-01", Some("2011-01-01")),
        ("e5", "2011-01-01", Some("2013-01-01")),
        ("e6", "2013-01-01", Some("2013-12-12")),
        ("e7", "2013-12-12", Some("2021-01-01")),
        ("e8", "2021-01-01", None),
    ])
});

/// ECF model for Swift-XRT, configured for one operation mode, event grade
/// selection, energy band and epoch.
///
/// XRT operates in windowed-timing (`wt`) and photon-counting (`pc`) mode;
/// the legal event grade selections depend on the mode.
///
/// ```
/// use xray_ecf::{EcfParams, SwiftXrt};
///
/// let model = SwiftXrt::builder("pc").grade("04").eband("2").build()?;
/// let ecf = model.ecf(EcfParams { nh: 5e21, gamma: 1.9, ..Default::default() });
/// assert!(ecf.value() > 0.0);
/// # Ok::<(), xray_ecf::EcfError>(())
/// ```
#[derive(Debug)]
pub struct SwiftXrt {
    mode: String,
    grade: String,
    eband: String,
    epoch: &'static str,
    core: ModelCore,
}

impl SwiftXrt {
    /// Operation modes and the event grade selections legal in each.
    pub const GRADES: &'static [(&'static str, &'static [&'static str])] = &[
        ("wt", &["0", "02"]),
        ("pc", &["0", "04", "012"]),
    ];

    /// Energy bands and their bounds in keV.
    pub const EBANDS: &'static [(&'static str, (f64, f64))] = &[
        ("0", (0.3, 10.0)),
        ("1", (0.3, 1.0)),
        ("2", (1.0, 2.0)),
        ("3", (2.0, 10.0)),
        ("SOFT", (0.5, 2.0)),
        ("HARD", (2.0, 10.0)),
    ];

    /// The calibration epochs.
    pub fn epochs() -> &'static EpochTable {
        &EPOCHS
    }

    /// Start building a model for an operation mode.
    pub fn builder(mode: &str) -> SwiftXrtBuilder<'static> {
        SwiftXrtBuilder {
            mode: mode.to_string(),
            grade: DEFAULT_GRADE.to_string(),
            eband: DEFAULT_EBAND.to_string(),
            date: None,
            store: None,
        }
    }

    /// Build a model for an operation mode with all other axes defaulted.
    pub fn new(mode: &str) -> Result<Self> {
        Self::builder(mode).build()
    }

    /// Evaluate the ECF for the given spectral parameters.
    pub fn ecf(&self, params: EcfParams) -> Ecf {
        self.core.evaluate(&params)
    }

    /// The resolved operation mode.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// The resolved event grade selection.
    pub fn grade(&self) -> &str {
        &self.grade
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

/// Builder for [`SwiftXrt`].
#[derive(Debug)]
pub struct SwiftXrtBuilder<'a> {
    mode: String,
    grade: String,
    eband: String,
    date: Option<NaiveDate>,
    store: Option<&'a CalibrationStore>,
}

impl<'a> SwiftXrtBuilder<'a> {
    /// Select the event grade selection (default `0`).
    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = grade.to_string();
        self
    }

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
    pub fn store<'b>(self, store: &'b CalibrationStore) -> SwiftXrtBuilder<'b> {
        SwiftXrtBuilder {
            mode: self.mode,
            grade: self.grade,
            eband: self.eband,
            date: self.date,
            store: Some(store),
        }
    }

    /// Resolve the configuration, load (or reuse) the calibration tables
    /// and build the interpolators.
    ///
    /// Resolution order matters: grade legality depends on the mode, so the
    /// mode resolves first.
    pub fn build(self) -> Result<SwiftXrt> {
        let (mode, grades) = SwiftXrt::GRADES
            .iter()
            .find(|(m, _)| *m == self.mode)
            .map(|(m, g)| (*m, *g))
            .ok_or_else(|| crate::error::EcfError::UnknownConfiguration {
                axis: "mode",
                value: self.mode.clone(),
            })?;
        let grade = resolve_axis("grade", &self.grade, grades.iter().copied())?.to_string();
        let eband =
            resolve_axis("energy band", &self.eband, SwiftXrt::EBANDS.iter().map(|(n, _)| *n))?
                .to_string();
        let epoch = EPOCHS.select(INSTRUMENT, self.date, DEFAULT_EPOCH)?;

        let store = self.store.unwrap_or(CalibrationStore::shared());
        let core = ModelCore::build(store.swift()?, &[mode, epoch, &grade, &eband])?;

        log::debug!(
            "configured {INSTRUMENT} model: mode={mode} grade={grade} eband={eband} epoch={epoch}"
        );

        Ok(SwiftXrt {
            mode: mode.to_string(),
            grade,
            eband,
            epoch,
            core,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::EcfError;

    #[test]
    fn test_defaults() {
        let model = SwiftXrt::new("wt").unwrap();

        assert_eq!(model.mode(), "wt");
        assert_eq!(model.grade(), "0");
        assert_eq!(model.eband(), "SOFT");
        assert_eq!(model.epoch(), "e6");
    }

    #[test]
    fn test_every_combination_constructs() {
        for (mode, grades) in SwiftXrt::GRADES {
            for grade in *grades {
                for (eband, _) in SwiftXrt::EBANDS {
                    let model = SwiftXrt::builder(mode)
                        .grade(grade)
                        .eband(eband)
                        .build()
                        .unwrap();
                    assert!(model.ecf(EcfParams::default()).value() > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_grade_legality_depends_on_mode() {
        // Grade 04 exists in pc mode only.
        assert!(SwiftXrt::builder("pc").grade("04").build().is_ok());

        let err = SwiftXrt::builder("wt").grade("04").build().unwrap_err();
        assert!(matches!(err, EcfError::UnknownConfiguration { axis, .. } if axis == "grade"));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = SwiftXrt::new("timing").unwrap_err();
        assert!(matches!(err, EcfError::UnknownConfiguration { axis, .. } if axis == "mode"));
    }

    #[test]
    fn test_date_selects_epoch() {
        let date = NaiveDate::from_ymd_opt(2010, 6, 15).unwrap();
        let model = SwiftXrt::builder("pc").date(date).build().unwrap();
        assert_eq!(model.epoch(), "e4");
    }

    #[test]
    fn test_seam_date_takes_first_matching_epoch() {
        // 2007-01-01 closes e1 and opens e2; both bounds are inclusive and
        // the first match wins.
        let date = NaiveDate::from_ymd_opt(2007, 1, 1).unwrap();
        let model = SwiftXrt::builder("pc").date(date).build().unwrap();
        assert_eq!(model.epoch(), "e1");
    }

    #[test]
    fn test_models_share_calibration_tables() {
        let a = SwiftXrt::builder("pc").grade("012").build().unwrap();
        let b = SwiftXrt::builder("wt").eband("HARD").build().unwrap();

        assert!(Arc::ptr_eq(a.core().tables(), b.core().tables()));
    }
}
