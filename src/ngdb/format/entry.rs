//! Entry record decoding.
//!
//! An entry is a 20-byte header followed by a body whose shape depends
//! on the type tag:
//! - Short entries interleave a jump offset with each line of text
//! - Long entries carry their lines back to back, then an optional
//!   see-also table in whatever body bytes remain

use log::{trace, warn};

use crate::ngdb::reader::GuideReader;
use crate::ngdb::types::error::{NgdbError, Result};
use crate::ngdb::types::models::{
    Entry, EntryCommon, EntryKind, EntryParent, LongEntry, Prompt, SeeAlso, ShortEntry, TYPE_END,
};

/// The fixed size of an entry record header.
pub(crate) const ENTRY_HEADER_SIZE: u64 = 20;

/// The parent index value that means "no parent".
const NO_PARENT: u16 = 0xFFFF;

/// Reads just enough of the record at the current position to learn its
/// total length in bytes.
///
/// The end-of-guide sentinel surfaces as [`Eof`][crate::NgdbError::Eof]
/// through the kind decode; an otherwise unknown tag is no obstacle to
/// skipping, so only the sentinel is checked here.
pub(crate) fn record_length(reader: &mut GuideReader) -> Result<u64> {
    let tag = reader.read_word()?;
    if tag == TYPE_END {
        return Err(NgdbError::Eof);
    }
    let _line_count = reader.read_word()?;
    let size = reader.read_word()? as u64;
    Ok(ENTRY_HEADER_SIZE + size)
}

/// Decodes the entry record at the current position.
///
/// The reader is left wherever the record data ends; restoring the
/// position is the caller's business.
pub(crate) fn parse(reader: &mut GuideReader) -> Result<Entry> {
    let offset = reader.position();

    let kind = EntryKind::from_tag(reader.read_word()?)?;
    let line_count = reader.read_word()? as usize;
    let size = reader.read_word()? as u64;
    let parent = parse_parent(reader)?;
    let previous = reader.read_offset()?;
    let next = reader.read_offset()?;
    let body_end = offset + ENTRY_HEADER_SIZE + size;

    trace!(
        "Entry at {:#x}: kind={:?}, lines={}, body={} bytes",
        offset,
        kind,
        line_count,
        size
    );

    match kind {
        EntryKind::Short => {
            let mut offsets = Vec::with_capacity(line_count);
            let mut lines = Vec::with_capacity(line_count);
            for _ in 0..line_count {
                offsets.push(reader.read_offset()?);
                lines.push(reader.read_prefixed_string()?);
            }
            Ok(Entry::Short(ShortEntry {
                common: EntryCommon { offset, parent, previous, next, lines },
                offsets,
            }))
        }
        EntryKind::Long => {
            let mut lines = Vec::with_capacity(line_count);
            for _ in 0..line_count {
                lines.push(reader.read_prefixed_string()?);
            }
            let see_also = if reader.position() < body_end {
                parse_see_also(reader)?
            } else {
                SeeAlso::default()
            };
            Ok(Entry::Long(LongEntry {
                common: EntryCommon { offset, parent, previous, next, lines },
                see_also,
            }))
        }
    }
}

/// Reads the three parent index words behind the entry header.
fn parse_parent(reader: &mut GuideReader) -> Result<EntryParent> {
    let menu = parent_index(reader.read_word()?);
    let prompt = parent_index(reader.read_word()?);
    let line = parent_index(reader.read_word()?);
    Ok(EntryParent::new(menu, prompt, line))
}

/// Maps an on-disk parent index to an optional one.
fn parent_index(value: u16) -> Option<usize> {
    (value != NO_PARENT).then_some(value as usize)
}

/// Decodes the see-also table trailing a long entry's lines.
fn parse_see_also(reader: &mut GuideReader) -> Result<SeeAlso> {
    let declared = reader.read_word()? as usize;
    let count = declared.min(SeeAlso::MAX_SEE_ALSO);
    if count != declared {
        warn!(
            "See-also count {} exceeds the format maximum of {}; clamping",
            declared,
            SeeAlso::MAX_SEE_ALSO
        );
    }

    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(reader.read_offset()?);
    }
    let mut prompts = Vec::with_capacity(count);
    for offset in offsets {
        let text = reader.read_prefixed_string()?;
        prompts.push(Prompt::new(text, offset));
    }
    Ok(SeeAlso::new(prompts))
}
