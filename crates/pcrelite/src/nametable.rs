//! # Name Table Decoder
//!
//! Engines report named subpatterns as a packed binary table of
//! `name_count` fixed-width entries, `entry_size` bytes each: a 2-byte
//! big-endian group index, the NUL-terminated name, and zero padding
//! out to the entry width. For example (`??` marks pad bytes):
//!
//! ```text
//! 00 01 d  a  t  e  00 ??
//! 00 05 d  a  y  00 ?? ??
//! 00 04 m  o  n  t  h  00
//! 00 02 y  e  a  r  00 ??
//! ```
//!
//! `entry_size` is authoritative for advancing between entries; the
//! terminator only delimits the name within an entry.

use ahash::AHashMap;

use crate::errors::{PLResult, PcreliteError};

fn malformed(detail: String) -> PcreliteError {
    PcreliteError::Introspection { detail }
}

/// Decode a binary name table into a name → group-index map.
///
/// Group indices are 1-based. Duplicate names are permitted by some
/// engine configurations; the last entry wins. The returned map is
/// owned and keeps no reference to `table`.
pub fn decode_name_table(
    table: &[u8],
    name_count: usize,
    entry_size: usize,
) -> PLResult<AHashMap<String, usize>> {
    let mut names = AHashMap::with_capacity(name_count);
    if name_count == 0 {
        return Ok(names);
    }

    if entry_size < 3 {
        return Err(malformed(format!(
            "name table entry size {entry_size} cannot hold an index and a terminated name"
        )));
    }
    let needed = name_count * entry_size;
    if table.len() < needed {
        return Err(malformed(format!(
            "name table holds {} bytes, expected {needed} for {name_count} entries",
            table.len()
        )));
    }

    for entry in table[..needed].chunks_exact(entry_size) {
        let index = u16::from_be_bytes([entry[0], entry[1]]) as usize;
        let tail = &entry[2..];
        let name_len = tail
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| malformed(format!("name table entry for group {index} is unterminated")))?;
        let name = core::str::from_utf8(&tail[..name_len])
            .map_err(|_| malformed(format!("name table entry for group {index} is not UTF-8")))?;
        names.insert(name.to_string(), index);
    }

    Ok(names)
}
