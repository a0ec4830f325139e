//! File header decoding.
//!
//! Field order on the wire, all integers little-endian:
//!
//! | field                     | V1 | V2 | V3 |
//! |---------------------------|----|----|----|
//! | `format_version` u16      |    |    | x  |
//! | MAC, 6 bytes              | x  | x  | x  |
//! | `channel` u8              |    | x  |    |
//! | scan interval u32         | x  | x  | x  |
//! | timezone (u8 len + str)   | x  | x  | x  |
//! | metadata (u32 len + str)  | x  | x  | x  |
use log::trace;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::record::{Header, MacAddress, Revision};

/// Decode the header at `cursor` using the layout of `revision`.
///
/// Returns the header and the offset of the first entry byte.
pub fn decode_header(buffer: &[u8], cursor: usize, revision: Revision) -> Result<(Header, usize)> {
    let mut c = Cursor::new(buffer, cursor)?;
    c.require(revision.min_header_len())?;

    let format_version = match revision {
        Revision::V3 => Some(c.read_u16()?),
        Revision::V1 | Revision::V2 => None,
    };
    let device_mac = MacAddress(c.read_mac()?);
    let channel = match revision {
        Revision::V2 => Some(c.read_u8()?),
        Revision::V1 | Revision::V3 => None,
    };
    let scan_interval_seconds = c.read_u32()?;
    let timezone_name = c.read_str_u8("timezone_name")?;
    let metadata = c.read_str_u32("metadata")?;

    let header = Header {
        revision,
        format_version,
        device_mac,
        channel,
        scan_interval_seconds,
        timezone_name,
        metadata,
    };
    trace!("header {} ends at offset {}", header.device_mac, c.position());
    Ok((header, c.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    const MAC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

    fn v3_bytes(tz: &str, metadata: &[u8]) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&7u16.to_le_bytes());
        b.extend_from_slice(&MAC);
        b.extend_from_slice(&300u32.to_le_bytes());
        b.push(tz.len() as u8);
        b.extend_from_slice(tz.as_bytes());
        b.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        b.extend_from_slice(metadata);
        b
    }

    #[test]
    fn decodes_v3_header() {
        let buf = v3_bytes("Europe/Berlin", b"site=roof");
        let (h, end) = decode_header(&buf, 0, Revision::V3).unwrap();
        assert_eq!(end, buf.len());
        assert_eq!(h.format_version, Some(7));
        assert_eq!(h.device_mac.to_string(), "00:11:22:33:44:55");
        assert_eq!(h.channel, None);
        assert_eq!(h.scan_interval_seconds, 300);
        assert_eq!(h.timezone_name, "Europe/Berlin");
        assert_eq!(h.metadata, "site=roof");
        assert_eq!(h.wire_len(), end);
    }

    #[test]
    fn decodes_v2_channel_after_mac() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAC);
        buf.push(11);
        buf.extend_from_slice(&60u32.to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&0u32.to_le_bytes());
        let (h, end) = decode_header(&buf, 0, Revision::V2).unwrap();
        assert_eq!(end, 16);
        assert_eq!(h.channel, Some(11));
        assert_eq!(h.format_version, None);
        assert_eq!(h.scan_interval_seconds, 60);
        assert!(h.timezone_name.is_empty());
        assert!(h.metadata.is_empty());
    }

    #[test]
    fn same_prefix_consumes_different_lengths_per_revision() {
        // MAC then interval, empty strings; V3 reads a version tag first.
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAC);
        buf.extend_from_slice(&60u32.to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);

        let (v1, end_v1) = decode_header(&buf, 0, Revision::V1).unwrap();
        let (_, end_v3) = decode_header(&buf, 0, Revision::V3).unwrap();
        assert_eq!(v1.device_mac.to_string(), "00:11:22:33:44:55");
        assert_eq!(end_v1, 15);
        assert_eq!(end_v3, 17);
        assert_ne!(end_v1, end_v3);
    }

    #[test]
    fn short_metadata_is_truncated_not_short_string() {
        let mut buf = v3_bytes("UTC", b"");
        let len_at = buf.len() - 4;
        buf[len_at..].copy_from_slice(&10u32.to_le_bytes());
        buf.extend_from_slice(b"abcde");
        let err = decode_header(&buf, 0, Revision::V3).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: buf.len() - 5, needed: 10, available: 5 });
    }

    #[test]
    fn below_minimum_prefix_is_truncated() {
        let buf = [0u8; 16];
        let err = decode_header(&buf, 0, Revision::V3).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 0, needed: 17, available: 16 });
        assert!(decode_header(&buf, 0, Revision::V2).is_ok());
    }

    #[test]
    fn bad_timezone_utf8_is_malformed() {
        let mut buf = v3_bytes("ab", b"");
        let tz_at = 2 + 6 + 4 + 1;
        buf[tz_at] = 0xff;
        match decode_header(&buf, 0, Revision::V3) {
            Err(DecodeError::MalformedText { field: "timezone_name", offset, .. }) => assert_eq!(offset, tz_at),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_metadata_utf8_is_malformed() {
        let mut buf = v3_bytes("UTC", b"ok\xc3\x28");
        let meta_at = 2 + 6 + 4 + 1 + 3 + 4;
        assert_eq!(buf[meta_at], b'o');
        match decode_header(&buf, 0, Revision::V3) {
            Err(DecodeError::MalformedText { field: "metadata", offset, .. }) => assert_eq!(offset, meta_at),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cursor_past_end_is_rejected_at_requested_offset() {
        let buf = [0u8; 20];
        let err = decode_header(&buf, 50, Revision::V1).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 50, needed: 0, available: 0 });
    }

    #[test]
    fn starts_at_given_cursor() {
        let mut buf = vec![0xaa, 0xbb, 0xcc];
        buf.extend_from_slice(&v3_bytes("UTC", b"m"));
        let (h, end) = decode_header(&buf, 3, Revision::V3).unwrap();
        assert_eq!(h.metadata, "m");
        assert_eq!(end, buf.len());
    }
}
