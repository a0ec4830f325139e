//! Entry stream decoding.
//!
//! Each entry is `[timestamp:i32][channel:u16, V3 only][count:u16][count x i8]`.
//! Entries follow each other with no padding until the end of the buffer.
use log::trace;

use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::record::{Entry, Revision};

/// Decode every entry from `cursor` to the end of `buffer`, in file order.
///
/// The stream must end exactly on an entry boundary.
pub fn decode_entries(buffer: &[u8], cursor: usize, revision: Revision) -> Result<Vec<Entry>> {
    let mut c = Cursor::new(buffer, cursor)?;
    let prefix = revision.entry_prefix_len();
    let mut out = Vec::new();

    while !c.is_empty() {
        if c.remaining() < prefix {
            return Err(DecodeError::TrailingBytes { offset: c.position(), remaining: c.remaining() });
        }
        out.push(decode_entry(&mut c, revision)?);
    }
    trace!("{} entries decoded", out.len());
    Ok(out)
}

fn decode_entry(c: &mut Cursor<'_>, revision: Revision) -> Result<Entry> {
    let timestamp = c.read_i32()?;
    let channel_number = match revision {
        Revision::V3 => Some(c.read_u16()?),
        Revision::V1 | Revision::V2 => None,
    };
    let count = c.read_u16()? as usize;
    let samples = c.read_samples(count)?;
    Ok(Entry { timestamp, channel_number, samples })
}
