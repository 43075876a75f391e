//! Local time zone reporting.
//!
//! When the zone name can't be read from the process, the current UTC
//! offset is mapped to a representative zone through a fixed table.

use chrono::{Local, Offset};

use crate::config::Env;

/// Placeholder name meaning "the zone has no usable name".
pub const UNKNOWN_ZONE: &str = "Local";

/// Representative zone per UTC offset, in seconds. Sorted by offset.
const ZONES_BY_OFFSET: &[(i32, &str)] = &[
    (-39600, "Pacific/Niue"),
    (-36000, "Pacific/Honolulu"),
    (-34200, "Pacific/Marquesas"),
    (-32400, "America/Anchorage"),
    (-28800, "America/Los_Angeles"),
    (-25200, "America/Chihuahua"),
    (-21600, "America/Chicago"),
    (-18000, "America/Bogota"),
    (-14400, "America/Caracas"),
    (-12600, "America/St_Johns"),
    (-10800, "America/Argentina/Buenos_Aires"),
    (-7200, "Atlantic/South_Georgia"),
    (-3600, "Atlantic/Cape_Verde"),
    (0, "Europe/London"),
    (3600, "Europe/Amsterdam"),
    (7200, "Europe/Athens"),
    (10800, "Europe/Istanbul"),
    (12600, "Asia/Tehran"),
    (14400, "Asia/Dubai"),
    (16200, "Asia/Kabul"),
    (18000, "Asia/Tashkent"),
    (19800, "Asia/Kolkata"),
    (20700, "Asia/Kathmandu"),
    (21600, "Asia/Dhaka"),
    (23400, "Asia/Rangoon"),
    (25200, "Asia/Bangkok"),
    (28800, "Asia/Manila"),
    (31500, "Australia/Eucla"),
    (32400, "Asia/Tokyo"),
    (34200, "Australia/Darwin"),
    (36000, "Australia/Brisbane"),
    (37800, "Australia/Adelaide"),
    (39600, "Pacific/Guadalcanal"),
    (43200, "Pacific/Nauru"),
    (46800, "Pacific/Auckland"),
    (49500, "Pacific/Chatham"),
    (50400, "Pacific/Kiritimati"),
];

/// Zone name for a UTC offset in seconds, if the offset is in the table.
///
/// ```
/// use ghx::http::zone_for_offset;
///
/// assert_eq!(zone_for_offset(0), Some("Europe/London"));
/// assert_eq!(zone_for_offset(19800), Some("Asia/Kolkata"));
/// assert_eq!(zone_for_offset(60), None);
/// ```
pub fn zone_for_offset(offset_secs: i32) -> Option<&'static str> {
    ZONES_BY_OFFSET
        .binary_search_by_key(&offset_secs, |(offset, _)| *offset)
        .ok()
        .map(|i| ZONES_BY_OFFSET[i].1)
}

/// The process's local zone: a name (possibly [`UNKNOWN_ZONE`]) and the
/// current UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalZone {
    /// Zone name, e.g. `Europe/Paris`.
    pub name: String,
    /// Seconds east of UTC.
    pub offset_secs: i32,
}

impl LocalZone {
    /// Create a zone snapshot.
    pub fn new(name: impl Into<String>, offset_secs: i32) -> Self {
        Self {
            name: name.into(),
            offset_secs,
        }
    }

    /// Read the zone name from `env` and the offset from the system clock.
    ///
    /// The two sources differ when `env` is not the process environment:
    /// the clock always reflects the process's real `TZ`. The offset only
    /// matters when `env` yields no zone name.
    pub fn from_env(env: &dyn Env) -> Self {
        Self::from_env_at(env, Local::now().offset().fix().local_minus_utc())
    }

    /// Read the zone name from `env`, pairing it with `offset_secs`.
    ///
    /// `TZ` unset (or pointing at a file) yields [`UNKNOWN_ZONE`]; `TZ=""`
    /// means UTC.
    pub fn from_env_at(env: &dyn Env, offset_secs: i32) -> Self {
        let name = match env.var("TZ") {
            None => UNKNOWN_ZONE.to_string(),
            Some(tz) if tz.is_empty() => "UTC".to_string(),
            Some(tz) => {
                let tz = tz.trim_start_matches(':');
                if tz.is_empty() || tz.starts_with('/') {
                    UNKNOWN_ZONE.to_string()
                } else {
                    tz.to_string()
                }
            }
        };
        Self { name, offset_secs }
    }

    /// Value for the `Time-Zone` header, if one can be determined.
    pub fn header_value(&self) -> Option<&str> {
        if !self.name.is_empty() && self.name != UNKNOWN_ZONE {
            return Some(&self.name);
        }
        zone_for_offset(self.offset_secs)
    }
}
