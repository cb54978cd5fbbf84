//! The guide handle: opening, header state, and entry navigation.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::format::{entry, header, menu};
use super::iter::Entries;
use super::reader::GuideReader;
use super::types::error::{NgdbError, Result};
use super::types::models::{Entry, Menu};

/// The first byte of the end-of-guide sentinel word.
const END_SENTINEL: u8 = 0xFF;

/// An open Norton Guide or Expert Help database.
///
/// Opening a guide decodes its header and menu chain up front; entries
/// are then loaded on demand through a single location pointer. `load`
/// never moves that pointer; only `goto`, `goto_first`, and `skip` do.
///
/// The file handle is owned exclusively and released when the guide is
/// dropped, on every exit path; [`close`](Guide::close) is the explicit
/// spelling of the same thing.
///
/// # Example
/// ```no_run
/// # use ngdb_reader::Guide;
/// # fn main() -> ngdb_reader::Result<()> {
/// let mut guide = Guide::open("expert.ng")?;
/// println!("{} ({})", guide.title(), guide.made_with());
/// for entry in guide.entries() {
///     let entry = entry?;
///     println!("{} lines at {:#x}", entry.lines().len(), entry.offset());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Guide {
    reader: GuideReader,
    path: PathBuf,
    file_size: u64,
    header: header::Header,
    menus: Vec<Menu>,
    menu_start: u64,
    first_entry: u64,
}

impl Guide {
    /// Opens and decodes the guide file at `path`.
    ///
    /// A file that opens fine but whose magic is not a guide's still
    /// yields a handle: [`is_a`](Guide::is_a) reports `false`, content
    /// accessors return empty values, and navigation returns
    /// [`NgdbError::NotAGuide`].
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be opened or read
    /// - The file ends before the header and menu chain are complete
    /// - The menu chain declares a structure this reader rejects
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Opening guide: {}", path.display());
        let mut reader = GuideReader::open(&path)?;
        let file_size = reader.file_size()?;

        // Step 1: Decode the fixed header (magic, title, credits).
        let header = header::parse(&mut reader).map_err(short_read)?;

        // Step 2: Walk the menu chain. Not-a-guide files get none.
        let menu_start = reader.position();
        let menus = if header.is_a() {
            menu::parse_chain(&mut reader, header.menu_count).map_err(short_read)?
        } else {
            Vec::new()
        };

        // Step 3: Whatever follows the last menu is the first entry.
        let first_entry = reader.position();

        info!(
            "Guide opened: '{}' ({}), {} menus, first entry at {:#x}",
            header.title,
            header.made_with(),
            menus.len(),
            first_entry
        );

        Ok(Self {
            reader,
            path,
            file_size,
            header,
            menus,
            menu_start,
            first_entry,
        })
    }

    /// The path the guide was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The size of the guide file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// The two-character magic tag found at the start of the file.
    pub fn magic(&self) -> &str {
        &self.header.magic
    }

    /// Is this file actually a guide?
    pub fn is_a(&self) -> bool {
        self.header.is_a()
    }

    /// The name of the tool that was used to make the guide.
    pub fn made_with(&self) -> &'static str {
        self.header.made_with()
    }

    /// The title of the guide.
    pub fn title(&self) -> &str {
        &self.header.title
    }

    /// The credits for the guide, as up to five lines.
    pub fn credits(&self) -> &[String] {
        &self.header.credits
    }

    /// The guide's menus, in file order.
    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    /// The count of menus in the guide.
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// The byte offset of the first menu record.
    pub fn menu_start(&self) -> u64 {
        self.menu_start
    }

    /// The byte offset of the first entry.
    pub fn first_entry(&self) -> u64 {
        self.first_entry
    }

    /// The current value of the location pointer.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Navigation on something that is not a guide has nowhere to go.
    fn ensure_guide(&self) -> Result<()> {
        if self.header.is_a() {
            Ok(())
        } else {
            Err(NgdbError::NotAGuide)
        }
    }

    /// Moves the location pointer to an absolute byte offset.
    pub fn goto(&mut self, offset: u64) -> &mut Self {
        self.reader.seek(offset);
        self
    }

    /// Moves the location pointer to the first entry.
    pub fn goto_first(&mut self) -> Result<&mut Self> {
        self.ensure_guide()?;
        self.reader.seek(self.first_entry);
        Ok(self)
    }

    /// Is the location pointer at the end of the guide?
    ///
    /// True when the pointer sits at or past the end of the file, or on
    /// the end-of-guide sentinel.
    pub fn eof(&mut self) -> bool {
        if !self.header.is_a() || self.reader.position() >= self.file_size {
            return true;
        }
        match self.reader.peek_byte() {
            Ok(byte) => byte == END_SENTINEL,
            Err(_) => true,
        }
    }

    /// Skips the entry at the current position.
    ///
    /// Reads just enough of the record to learn its length, then lands
    /// the pointer on the byte immediately after it.
    ///
    /// # Errors
    /// [`NgdbError::Eof`] when the pointer is at or past the end of the
    /// guide, or on the end-of-guide sentinel. The pointer is not rolled
    /// back on error; reposition explicitly when recovering.
    pub fn skip(&mut self) -> Result<&mut Self> {
        self.ensure_guide()?;
        let start = self.reader.position();
        let length = entry::record_length(&mut self.reader)?;
        self.reader.seek(start + length);
        debug!("Skipped entry at {:#x}, now at {:#x}", start, start + length);
        Ok(self)
    }

    /// Loads the entry at the current position.
    ///
    /// Loading never moves the location pointer: load, `skip`, and load
    /// again is the way to walk forward.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pointer is at or past the end of the guide, or on the
    ///   end-of-guide sentinel ([`NgdbError::Eof`])
    /// - The type tag is not a short or long entry
    ///   ([`NgdbError::UnknownEntryType`])
    /// - The record is truncated mid-read ([`NgdbError::Eof`])
    pub fn load(&mut self) -> Result<Entry> {
        self.ensure_guide()?;
        let position = self.reader.position();
        let result = entry::parse(&mut self.reader);
        self.reader.seek(position);
        result
    }

    /// Iterates over every entry in the guide, first to last.
    ///
    /// The sequence is restartable (each call starts again from the
    /// first entry) and ends cleanly at the end-of-guide sentinel. A
    /// file that is not a guide yields an empty sequence.
    pub fn entries(&mut self) -> Entries<'_> {
        Entries::new(self)
    }

    /// Closes the guide, releasing the file handle.
    ///
    /// Dropping the guide does the same; this form just makes the point
    /// of release explicit.
    pub fn close(self) {}
}

impl std::fmt::Debug for Guide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guide")
            .field("path", &self.path)
            .field("magic", &self.header.magic)
            .field("title", &self.header.title)
            .finish()
    }
}

/// An EOF while the header area is still being decoded is a short read,
/// not a navigation condition.
fn short_read(error: NgdbError) -> NgdbError {
    match error {
        NgdbError::Eof => NgdbError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "guide file ends inside its header area",
        )),
        other => other,
    }
}
