//! Single entry point over the header and entry decoders.
use log::debug;

use crate::entries::decode_entries;
use crate::error::Result;
use crate::header::decode_header;
use crate::record::{Entry, Header, Revision};

/// Decode a whole log file held in memory.
///
/// Either the header and every entry decode and the buffer is consumed to
/// the last byte, or nothing is returned.
pub fn decode(buffer: &[u8], revision: Revision) -> Result<(Header, Vec<Entry>)> {
    let (header, cursor) = decode_header(buffer, 0, revision)?;
    let entries = decode_entries(buffer, cursor, revision)?;
    debug!(
        "decoded {} log from {}: {} header bytes, {} entries, {} bytes total",
        revision,
        header.device_mac,
        cursor,
        entries.len(),
        buffer.len()
    );
    Ok((header, entries))
}
