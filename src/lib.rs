//! Reader for Norton Guide database files.
//!
//! Norton Guide (`.ng`) and Expert Help (`.eh`) files are a Clipper-era
//! MS-DOS hypertext help format. This crate decodes the on-disk format
//! (an XOR-obfuscated little-endian layout with run-length-encoded CP437
//! text) and exposes a navigable view of a guide's content:
//! - The header: magic, title, and credits
//! - Menus, each an ordered list of prompts linking to entries
//! - Short entries (flat lists of lines that jump elsewhere) and long
//!   entries (scrollable text with see-also cross-references)
//! - The `^`-escape markup inside entry lines, parsed to a token stream
//!
//! Reading is strictly read-only and single-threaded; a [`Guide`] owns
//! its file handle and releases it on drop.
//!
//! # Example
//! ```no_run
//! use ngdb_reader::{Guide, plain_text};
//!
//! # fn main() -> ngdb_reader::Result<()> {
//! let mut guide = Guide::open("clipper.ng")?;
//! println!("{}: {}", guide.made_with(), guide.title());
//! for entry in guide.entries() {
//!     for line in entry?.lines() {
//!         println!("{}", plain_text(line));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod ngdb;

pub use ngdb::{
    parse_markup, plain_text, visit_markup, Entries, Entry, EntryCommon, EntryKind, EntryParent,
    Guide, GuideReader, LongEntry, MarkupToken, MarkupVisitor, Menu, NgdbError, PlainText, Prompt,
    Result, SeeAlso, ShortEntry,
};
