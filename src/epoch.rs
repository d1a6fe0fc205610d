//! Calibration epoch selection.
//!
//! Instrument responses drift over a mission's lifetime, so the calibration
//! teams split each mission into named epochs with their own response files.
//! An observation date is mapped onto an epoch by scanning an ordered list
//! of date intervals.

use chrono::{NaiveDate, Utc};

use crate::error::{EcfError, Result};

/// A named calibration epoch covering a date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochInterval {
    /// Epoch name as used in the calibration tables ("e1", "e2", ...).
    pub name: &'static str,
    /// First date of the epoch.
    pub start: NaiveDate,
    /// Last date of the epoch; `None` for the open-ended most recent epoch,
    /// which is bounded by "today" at selection time.
    pub end: Option<NaiveDate>,
}

/// An ordered list of calibration epochs for one instrument (or one
/// detector type, for instruments whose epochs vary per detector).
#[derive(Debug, Clone)]
pub struct EpochTable {
    intervals: Vec<EpochInterval>,
}

impl EpochTable {
    /// Build a table from `(name, start, end)` date literals in `%Y-%m-%d`
    /// form. Invalid literals are programming errors and panic.
    pub(crate) fn from_literals(
        entries: &[(&'static str, &'static str, Option<&'static str>)],
    ) -> Self {
        let intervals = entries
            .iter()
            .map(|&(name, start, end)| EpochInterval {
                name,
                start: parse_literal(start),
                end: end.map(parse_literal),
            })
            .collect();

        Self { intervals }
    }

    /// The epochs in declaration order.
    pub fn intervals(&self) -> &[EpochInterval] {
        &self.intervals
    }

    /// Map an optional observation date onto an epoch name.
    ///
    /// With no date, the instrument's default epoch is returned as-is. With
    /// a date, the intervals are scanned in declaration order and the first
    /// one containing the date wins. Both interval bounds are inclusive, so
    /// a date exactly on a seam between two epochs satisfies both and
    /// resolves to the earlier one. This mirrors the behavior of the
    /// reference calibration tables and is intentional.
    pub fn select(
        &self,
        instrument: &'static str,
        date: Option<NaiveDate>,
        default: &'static str,
    ) -> Result<&'static str> {
        let date = match date {
            None => return Ok(default),
            Some(date) => date,
        };

        for interval in &self.intervals {
            let end = interval.end.unwrap_or_else(|| Utc::now().date_naive());
            if interval.start <= date && date <= end {
                return Ok(interval.name);
            }
        }

        Err(EcfError::DateOutOfRange { instrument, date })
    }
}

fn parse_literal(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("invalid epoch date literal {s}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EpochTable {
        EpochTable::from_literals(&[
            ("e1", "2004-12-01", Some("2007-01-01")),
            ("e2", "2007-01-01", Some("2009-01-01")),
            ("e3", "2009-01-01", None),
        ])
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_date_returns_default() {
        assert_eq!(table().select("test", None, "e2").unwrap(), "e2");
    }

    #[test]
    fn test_date_inside_interval() {
        let t = table();

        assert_eq!(t.select("test", Some(day(2005, 6, 15)), "e1").unwrap(), "e1");
        assert_eq!(t.select("test", Some(day(2008, 3, 1)), "e1").unwrap(), "e2");
    }

    #[test]
    fn test_seam_date_resolves_to_earlier_epoch() {
        // 2007-01-01 ends e1 and starts e2; first match wins.
        let t = table();
        assert_eq!(t.select("test", Some(day(2007, 1, 1)), "e1").unwrap(), "e1");
    }

    #[test]
    fn test_open_ended_interval_contains_today() {
        let t = table();
        let today = Utc::now().date_naive();
        assert_eq!(t.select("test", Some(today), "e1").unwrap(), "e3");
    }

    #[test]
    fn test_pre_mission_date_is_out_of_range() {
        let err = table()
            .select("test", Some(day(1999, 1, 1)), "e1")
            .unwrap_err();
        assert!(matches!(err, EcfError::DateOutOfRange { .. }));
    }
}
