//! Menu chain decoding.
//!
//! The menus sit between the credits block and the first entry, one
//! variable-length record per menu. Each record is a 20-byte header, a
//! fixed-width run-length-encoded title, the prompt target offsets
//! (with one ignored terminator), and the prompt texts.

use log::{debug, warn};

use crate::ngdb::reader::GuideReader;
use crate::ngdb::types::error::{NgdbError, Result};
use crate::ngdb::types::models::{Menu, Prompt};

/// The marker word that opens every menu record.
const MENU_MARKER: u16 = 1;
/// The fixed size of a menu record header.
const MENU_HEADER_SIZE: u64 = 20;
/// The on-disk width of a menu title.
const MENU_TITLE_LENGTH: usize = 40;

/// Walks the menu chain, decoding `menu_count` records in file order.
///
/// An empty chain is fine; the reader simply does not move.
pub(crate) fn parse_chain(reader: &mut GuideReader, menu_count: u16) -> Result<Vec<Menu>> {
    let mut menus = Vec::with_capacity(menu_count as usize);
    for index in 0..menu_count {
        menus.push(parse_record(reader, index)?);
    }
    Ok(menus)
}

/// Decodes a single menu record at the current position.
fn parse_record(reader: &mut GuideReader, index: u16) -> Result<Menu> {
    let start = reader.position();

    let marker = reader.read_word()?;
    if marker != MENU_MARKER {
        return Err(NgdbError::Unsupported(format!(
            "menu {} has marker {:#06x} where {:#06x} was expected",
            index, marker, MENU_MARKER
        )));
    }
    let size = reader.read_word()? as u64;
    let prompt_count = reader.read_word()? as usize;

    // The rest of the 20-byte record header is padding.
    reader.seek(start + MENU_HEADER_SIZE);

    let title = reader.read_string_expanded(MENU_TITLE_LENGTH)?;

    let mut offsets = Vec::with_capacity(prompt_count);
    for _ in 0..prompt_count {
        offsets.push(reader.read_offset()?);
    }
    // One extra offset terminates the array; its value carries nothing.
    let _ = reader.read_offset()?;

    let mut prompts = Vec::with_capacity(prompt_count);
    for offset in offsets {
        let text = reader.read_prefixed_string()?;
        prompts.push(Prompt::new(text, offset));
    }

    // The size field says where the record ends; trust it over our own
    // arithmetic so one odd record cannot derail the rest of the chain.
    let end = start + MENU_HEADER_SIZE + size;
    if reader.position() != end {
        warn!(
            "Menu {} record ends at {:#x} but its size field says {:#x}; resynchronising",
            index,
            reader.position(),
            end
        );
        reader.seek(end);
    }

    debug!("Menu {} '{}' decoded with {} prompts", index, title, prompts.len());
    Ok(Menu::new(title, prompts))
}
