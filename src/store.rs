//! Loading and caching of the calibration data assets.
//!
//! Each instrument family ships one nocorr/abscorr pair of gzip-compressed
//! JSON tables, embedded in the binary. A [`CalibrationStore`] decompresses
//! and parses a pair at most once and hands out shared read-only references;
//! model construction is therefore cheap after the first load.

use std::sync::Arc;

use flate2::read::GzDecoder;
use once_cell::sync::OnceCell;

use crate::error::{EcfError, Result};
use crate::table::{CalibrationTable, Grid};

static EROSITA_NOCORR: &[u8] = include_bytes!("../data/erosita_ecfs.json.gz");
static EROSITA_ABSCORR: &[u8] = include_bytes!("../data/erosita_abscorr_ecfs.json.gz");
static SWIFT_NOCORR: &[u8] = include_bytes!("../data/swift_ecfs.json.gz");
static SWIFT_ABSCORR: &[u8] = include_bytes!("../data/swift_abscorr_ecfs.json.gz");
static XMM_NOCORR: &[u8] = include_bytes!("../data/xmm_ecfs.json.gz");
static XMM_ABSCORR: &[u8] = include_bytes!("../data/xmm_abscorr_ecfs.json.gz");

/// The two calibration tables of one instrument family.
///
/// `nocorr` holds ECFs with no Galactic absorption correction, `abscorr`
/// the absorption-corrected values. Both share the same axis vectors.
#[derive(Debug)]
pub(crate) struct CalibrationPair {
    instrument: &'static str,
    nocorr: CalibrationTable,
    abscorr: CalibrationTable,
}

impl CalibrationPair {
    /// log10 NH axis, common to both tables.
    pub fn lognh(&self) -> &[f64] {
        &self.nocorr.lognh
    }

    /// Photon index axis, common to both tables.
    pub fn gamma(&self) -> &[f64] {
        &self.nocorr.gamma
    }

    /// Slice the non-corrected grid for a resolved configuration path.
    pub fn nocorr_grid(&self, path: &[&str]) -> Result<&Grid> {
        self.nocorr.grid(self.instrument, path)
    }

    /// Slice the absorption-corrected grid for a resolved configuration path.
    pub fn abscorr_grid(&self, path: &[&str]) -> Result<&Grid> {
        self.abscorr.grid(self.instrument, path)
    }
}

/// Lazily-initialized, shared, read-only cache of calibration tables.
///
/// Each family loads at most once per store; concurrent first access is
/// serialized by the per-family cells. Models use the process-wide store
/// from [`CalibrationStore::shared`] unless an alternate store is injected
/// at construction.
#[derive(Debug, Default)]
pub struct CalibrationStore {
    erosita: OnceCell<Arc<CalibrationPair>>,
    swift: OnceCell<Arc<CalibrationPair>>,
    xmm: OnceCell<Arc<CalibrationPair>>,
}

impl CalibrationStore {
    /// Create an empty store; nothing is loaded until first use.
    pub const fn new() -> Self {
        Self {
            erosita: OnceCell::new(),
            swift: OnceCell::new(),
            xmm: OnceCell::new(),
        }
    }

    /// The process-wide store shared by all models by default.
    pub fn shared() -> &'static CalibrationStore {
        static SHARED: CalibrationStore = CalibrationStore::new();
        &SHARED
    }

    pub(crate) fn erosita(&self) -> Result<Arc<CalibrationPair>> {
        self.erosita
            .get_or_try_init(|| load_pair("eROSITA", EROSITA_NOCORR, EROSITA_ABSCORR))
            .cloned()
    }

    pub(crate) fn swift(&self) -> Result<Arc<CalibrationPair>> {
        self.swift
            .get_or_try_init(|| load_pair("Swift-XRT", SWIFT_NOCORR, SWIFT_ABSCORR))
            .cloned()
    }

    pub(crate) fn xmm(&self) -> Result<Arc<CalibrationPair>> {
        self.xmm
            .get_or_try_init(|| load_pair("XMM-EPIC", XMM_NOCORR, XMM_ABSCORR))
            .cloned()
    }
}

/// Decompress and parse one nocorr/abscorr pair, then check the structural
/// invariants shared by all instruments.
fn load_pair(
    instrument: &'static str,
    nocorr_gz: &[u8],
    abscorr_gz: &[u8],
) -> Result<Arc<CalibrationPair>> {
    let nocorr = load_table(instrument, nocorr_gz)?;
    let abscorr = load_table(instrument, abscorr_gz)?;

    if nocorr.lognh != abscorr.lognh || nocorr.gamma != abscorr.gamma {
        return Err(EcfError::CalibrationDataUnavailable {
            instrument,
            reason: "nocorr and abscorr tables disagree on the axis vectors".to_string(),
        });
    }

    log::info!(
        "loaded {instrument} calibration tables ({}x{} grids)",
        nocorr.lognh.len(),
        nocorr.gamma.len()
    );

    Ok(Arc::new(CalibrationPair {
        instrument,
        nocorr,
        abscorr,
    }))
}

fn load_table(instrument: &'static str, gz: &[u8]) -> Result<CalibrationTable> {
    let decoder = GzDecoder::new(gz);
    let table: CalibrationTable =
        serde_json::from_reader(decoder).map_err(|e| EcfError::CalibrationDataUnavailable {
            instrument,
            reason: format!("failed to decompress or parse table: {e}"),
        })?;

    table.validate(instrument)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_store_is_stable() {
        assert!(std::ptr::eq(
            CalibrationStore::shared(),
            CalibrationStore::shared()
        ));
    }

    #[test]
    fn test_family_loads_once() {
        let store = CalibrationStore::new();

        let first = store.xmm().unwrap();
        let second = store.xmm().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_pair_axes_are_shared() {
        let store = CalibrationStore::new();
        let pair = store.erosita().unwrap();

        assert!(pair.lognh().len() >= 2);
        assert!(pair.gamma().len() >= 2);
        assert!(pair.lognh().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_corrupt_asset_is_rejected() {
        let err = load_table("test", b"not gzip at all").unwrap_err();
        assert!(matches!(err, EcfError::CalibrationDataUnavailable { .. }));
    }
}
