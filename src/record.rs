use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;

use crate::error::DecodeError;

/// Wire layout revision. Older files carry no marker, so the caller picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Oldest layout: no version tag, no channel anywhere.
    V1,
    /// Header carries a one-byte channel after the MAC.
    V2,
    /// Header starts with `format_version`; entries carry a channel number.
    V3,
}

impl Revision {
    pub const ALL: [Revision; 3] = [Revision::V1, Revision::V2, Revision::V3];

    /// Smallest possible header: every fixed field plus empty strings.
    pub const fn min_header_len(self) -> usize {
        // mac + interval + tz len + metadata len
        let base = 6 + 4 + 1 + 4;
        match self {
            Revision::V1 => base,
            Revision::V2 => base + 1,
            Revision::V3 => base + 2,
        }
    }

    /// Bytes in front of the samples of every entry.
    pub const fn entry_prefix_len(self) -> usize {
        match self {
            Revision::V1 | Revision::V2 => 4 + 2,
            Revision::V3 => 4 + 2 + 2,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Revision::V1 => 1,
            Revision::V2 => 2,
            Revision::V3 => 3,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl TryFrom<u8> for Revision {
    type Error = DecodeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Revision::V1),
            2 => Ok(Revision::V2),
            3 => Ok(Revision::V3),
            other => Err(DecodeError::UnsupportedRevision(other.to_string())),
        }
    }
}

impl FromStr for Revision {
    type Err = DecodeError;

    /// Accepts `v1`..`v3` in any case, with or without the `v`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.strip_prefix(['v', 'V']).unwrap_or(t) {
            "1" => Ok(Revision::V1),
            "2" => Ok(Revision::V2),
            "3" => Ok(Revision::V3),
            _ => Err(DecodeError::UnsupportedRevision(s.to_string())),
        }
    }
}

/// Hardware address of the capturing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Device and session preamble at the start of every log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub revision: Revision,
    /// Only present in [`Revision::V3`].
    pub format_version: Option<u16>,
    pub device_mac: MacAddress,
    /// Only present in [`Revision::V2`].
    pub channel: Option<u8>,
    pub scan_interval_seconds: u32,
    /// Descriptive only, never applied to entry timestamps.
    pub timezone_name: String,
    pub metadata: String,
}

impl Header {
    /// Bytes this header occupies on the wire.
    pub fn wire_len(&self) -> usize {
        self.revision.min_header_len() + self.timezone_name.len() + self.metadata.len()
    }
}

/// One scan: a UTC timestamp and the RSSI samples taken at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// POSIX seconds, UTC.
    pub timestamp: i32,
    /// Only present in [`Revision::V3`].
    pub channel_number: Option<u16>,
    pub samples: Vec<i8>,
}

impl Entry {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Timestamp as a UTC date-time.
    pub fn recorded_at(&self) -> OffsetDateTime {
        // every i32 second count is inside time's supported range
        OffsetDateTime::from_unix_timestamp(self.timestamp as i64).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// Bytes this entry occupies on the wire under `revision`.
    pub fn wire_len(&self, revision: Revision) -> usize {
        revision.entry_prefix_len() + self.samples.len()
    }
}
