//! Typed views over the three SWPC index feeds consumed by the probability
//! model: Dst, the DSCOVR magnetometer Bz components, and the planetary Kp
//! index. Each feed is a JSON array ordered newest reading first; the fetch
//! layer hands the first element to these records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Latest disturbance-storm-time value from the hourly geospace Dst feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DstReading {
    pub dst: f64,
    #[serde(with = "time_tag")]
    pub time_tag: NaiveDateTime,
}

/// Latest interplanetary-magnetic-field reading from the DSCOVR magnetometer
/// feed. The model weighs `bz_gse`; a southward (negative) component couples
/// with the magnetosphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BzReading {
    pub bz_gsm: f64,
    pub bz_gse: f64,
    #[serde(with = "time_tag")]
    pub time_tag: NaiveDateTime,
}

/// Latest planetary Kp index. Keys the aurora visibility-zone table.
///
/// The feed spells the field `kp_index`; it serializes back out as `kp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpReading {
    #[serde(rename(deserialize = "kp_index"))]
    pub kp: i64,
    #[serde(with = "time_tag")]
    pub time_tag: NaiveDateTime,
}

/// SWPC `time_tag` strings are UTC but come in two shapes across products:
/// `2025-01-11T15:06:00` and `2025-01-11 15:06:00.000`, optionally with a
/// trailing `Z`. Accept both on the way in, emit the `T` form on the way out.
pub(crate) mod time_tag {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMATS[0]))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim_end_matches('Z');
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| de::Error::custom(format!("unrecognized time_tag '{raw}'")))
    }
}
