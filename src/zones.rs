//! Heart-rate training zone calculation
//!
//! Two pure calculators share the same five percentage bands:
//! heart-rate-reserve (Karvonen) zones and plain max-heart-rate zones.

use serde::Serialize;
use std::fmt;

/// One of the five fixed training-intensity bands, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneLevel {
    VeryLight,
    Light,
    Moderate,
    Hard,
    Maximum,
}

impl ZoneLevel {
    pub const ALL: [ZoneLevel; 5] = [
        ZoneLevel::VeryLight,
        ZoneLevel::Light,
        ZoneLevel::Moderate,
        ZoneLevel::Hard,
        ZoneLevel::Maximum,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ZoneLevel::VeryLight => "Zone 1 (Very Light)",
            ZoneLevel::Light => "Zone 2 (Light)",
            ZoneLevel::Moderate => "Zone 3 (Moderate)",
            ZoneLevel::Hard => "Zone 4 (Hard)",
            ZoneLevel::Maximum => "Zone 5 (Maximum)",
        }
    }

    /// Lower and upper fraction of the scaling basis
    pub fn band(self) -> (f64, f64) {
        match self {
            ZoneLevel::VeryLight => (0.50, 0.60),
            ZoneLevel::Light => (0.60, 0.70),
            ZoneLevel::Moderate => (0.70, 0.80),
            ZoneLevel::Hard => (0.80, 0.90),
            ZoneLevel::Maximum => (0.90, 1.00),
        }
    }
}

/// A single zone as an inclusive BPM range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub level: ZoneLevel,
    pub low: i64,
    pub high: i64,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}–{} BPM", self.level.label(), self.low, self.high)
    }
}

/// Five zones in ascending intensity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneTable {
    zones: [Zone; 5],
}

impl ZoneTable {
    fn build(bound: impl Fn(f64) -> i64) -> Self {
        let zones = ZoneLevel::ALL.map(|level| {
            let (low_pct, high_pct) = level.band();
            Zone {
                level,
                low: bound(low_pct),
                high: bound(high_pct),
            }
        });
        Self { zones }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[cfg(test)]
    pub fn get(&self, level: ZoneLevel) -> Zone {
        self.zones[level as usize]
    }

    /// Header line, a blank line, then one line per zone
    pub fn render(&self, header: &str) -> String {
        let mut out = format!("{header}\n\n");
        for zone in self.zones() {
            out.push_str(&zone.to_string());
            out.push('\n');
        }
        out
    }
}

/// Zones from heart-rate reserve: `round((mhr - rhr) * pct + rhr)`
///
/// Inputs are not validated. `rhr >= mhr` yields zero-width or inverted
/// ranges.
pub fn zones_hrr(mhr: i64, rhr: i64) -> ZoneTable {
    let rest = as_f64(rhr);
    let reserve = as_f64(mhr) - rest;
    ZoneTable::build(|pct| round_bpm(reserve * pct + rest))
}

/// Zones as a straight fraction of max heart rate: `round(mhr * pct)`
pub fn zones_simple(mhr: i64) -> ZoneTable {
    let max = as_f64(mhr);
    ZoneTable::build(|pct| round_bpm(max * pct))
}

#[allow(clippy::cast_precision_loss)] // heart rates are far below 2^52
fn as_f64(value: i64) -> f64 {
    value as f64
}

/// Ties go to the even neighbour
#[allow(clippy::cast_possible_truncation)] // float to int casts saturate
fn round_bpm(value: f64) -> i64 {
    value.round_ties_even() as i64
}
