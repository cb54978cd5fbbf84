//! Guide header decoding.
//!
//! The header occupies the first 378 bytes of the file: a two-byte raw
//! magic, two reserved words, the menu count, the title, and five lines
//! of credits. Everything after the magic is obfuscated like the rest
//! of the file.

use log::{debug, warn};

use crate::ngdb::reader::GuideReader;
use crate::ngdb::types::error::{NgdbError, Result};

/// Magic marker for a guide built with the Norton Guide compiler.
pub(crate) const MAGIC_NG: &str = "NG";
/// Magic marker for a guide built with Expert Help.
pub(crate) const MAGIC_EH: &str = "EH";

/// The length of the title field.
const TITLE_LENGTH: usize = 40;
/// The length of one line of the credits block.
const CREDIT_LENGTH: usize = 66;
/// The number of lines in the credits block.
const CREDIT_LINES: usize = 5;
/// The most menus a guide can declare.
const MAX_MENUS: u16 = 40;

/// The decoded fixed header of a guide.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub magic: String,
    pub menu_count: u16,
    pub title: String,
    pub credits: Vec<String>,
}

impl Header {
    /// Does the magic mark this file as an actual guide?
    pub fn is_a(&self) -> bool {
        self.magic == MAGIC_NG || self.magic == MAGIC_EH
    }

    /// The name of the tool the magic says built this guide.
    pub fn made_with(&self) -> &'static str {
        match self.magic.as_str() {
            MAGIC_NG => "Norton Guide",
            MAGIC_EH => "Expert Help",
            _ => "Unknown",
        }
    }

    /// A header for a file that is not a guide: empty everything.
    fn not_a_guide(magic: String) -> Self {
        Self {
            magic,
            menu_count: 0,
            title: String::new(),
            credits: Vec::new(),
        }
    }
}

/// Decodes the header from a just-opened reader.
///
/// The magic probe is the one read in the whole file that skips the
/// obfuscation transform. A file whose magic is unrecognised still
/// produces a header, flagged as not-a-guide with empty content, so
/// the caller can keep the handle around without it ever raising.
pub(crate) fn parse(reader: &mut GuideReader) -> Result<Header> {
    let magic: String = reader
        .read_raw_bytes(2)?
        .iter()
        .map(|&byte| byte as char)
        .collect();

    let header = Header::not_a_guide(magic);
    if !header.is_a() {
        warn!("Magic {:?} does not mark a guide; content will be empty", header.magic);
        return Ok(header);
    }

    // Two reserved words nobody has ever documented.
    reader.skip(4);

    let menu_count = reader.read_word()?;
    if menu_count > MAX_MENUS {
        return Err(NgdbError::Unsupported(format!(
            "menu count {} exceeds the format maximum of {}",
            menu_count, MAX_MENUS
        )));
    }

    let title = reader.read_string(TITLE_LENGTH)?;
    let credits = (0..CREDIT_LINES)
        .map(|_| reader.read_string(CREDIT_LENGTH))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Header decoded: made_with='{}', title='{}', menus={}",
        header.made_with(),
        title,
        menu_count
    );

    Ok(Header {
        menu_count,
        title,
        credits,
        ..header
    })
}
