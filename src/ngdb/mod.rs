//! Core Norton Guide reading module.

pub mod codec;
pub(crate) mod format;
pub mod guide;
pub mod iter;
pub mod parser;
pub mod reader;
pub mod types;

pub use guide::Guide;
pub use iter::Entries;
pub use parser::{
    parse_markup, plain_text, visit_markup, MarkupToken, MarkupVisitor, PlainText,
};
pub use reader::GuideReader;
pub use types::error::{NgdbError, Result};
pub use types::models::{
    Entry, EntryCommon, EntryKind, EntryParent, LongEntry, Menu, Prompt, SeeAlso, ShortEntry,
};
