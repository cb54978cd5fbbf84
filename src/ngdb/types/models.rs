//! Core data structures for guide content.
//!
//! This module defines the types handed out by the reader:
//! - Menus and their prompts
//! - Short and long entries, with their shared common record
//! - Parent linkage and see-also cross-references

use super::error::{NgdbError, Result};

/// The two kinds of entry a guide can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A flat list of lines, each a jump to another entry.
    Short,
    /// Scrollable text with optional see-also cross-references.
    Long,
}

/// The on-disk entry type tags.
pub(crate) const TYPE_SHORT: u16 = 0;
pub(crate) const TYPE_LONG: u16 = 1;
/// The tag (and first byte) that marks the end of the entry stream.
pub(crate) const TYPE_END: u16 = 0xFFFF;

impl EntryKind {
    /// Maps an on-disk type tag to a kind.
    ///
    /// The end-of-guide sentinel reads as [`NgdbError::Eof`]; anything
    /// else unrecognised as [`NgdbError::UnknownEntryType`].
    pub(crate) fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            TYPE_SHORT => Ok(Self::Short),
            TYPE_LONG => Ok(Self::Long),
            TYPE_END => Err(NgdbError::Eof),
            other => Err(NgdbError::UnknownEntryType(other)),
        }
    }
}

/// Some text linked to an offset in the guide.
///
/// Menus, short-entry lines, and see-also tables are all sequences of
/// these. An absent offset means the text leads nowhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    offset: Option<u64>,
}

impl Prompt {
    pub(crate) fn new(text: String, offset: Option<u64>) -> Self {
        Self { text, offset }
    }

    /// The text of the prompt.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The offset of the entry this prompt points at, if any.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Does this prompt actually lead anywhere?
    pub fn has_offset(&self) -> bool {
        self.offset.is_some()
    }
}

/// A top-level menu from the guide's header area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    title: String,
    prompts: Vec<Prompt>,
}

impl Menu {
    pub(crate) fn new(title: String, prompts: Vec<Prompt>) -> Self {
        Self { title, prompts }
    }

    /// The title of the menu.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The prompts in the menu, in display order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// The number of prompts in the menu.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Does the menu contain no prompts?
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Iterates over the menu's prompts.
    pub fn iter(&self) -> std::slice::Iter<'_, Prompt> {
        self.prompts.iter()
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

/// The cross-reference table attached to a long entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeeAlso {
    prompts: Vec<Prompt>,
}

impl SeeAlso {
    /// The most see-also items an entry can carry.
    ///
    /// This is the limit published in the Expert Help compiler manual;
    /// counts above it in a guide indicate corruption and are clamped.
    pub const MAX_SEE_ALSO: usize = 20;

    pub(crate) fn new(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    /// The see-also prompts, in table order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// The number of see-also items.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Iterates over the see-also prompts.
    pub fn iter(&self) -> std::slice::Iter<'_, Prompt> {
        self.prompts.iter()
    }
}

impl<'a> IntoIterator for &'a SeeAlso {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

/// Where a loaded entry was reached from.
///
/// Each index is absent when the entry has no such parent; together they
/// let a caller rebuild a navigation trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryParent {
    menu: Option<usize>,
    prompt: Option<usize>,
    line: Option<usize>,
}

impl EntryParent {
    pub(crate) fn new(menu: Option<usize>, prompt: Option<usize>, line: Option<usize>) -> Self {
        Self { menu, prompt, line }
    }

    /// The index of the menu that leads to this entry.
    pub fn menu(&self) -> Option<usize> {
        self.menu
    }

    /// The index of the menu prompt that leads to this entry.
    pub fn prompt(&self) -> Option<usize> {
        self.prompt
    }

    /// The line in the parent entry that points at this entry.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Is there a menu related to this entry?
    pub fn has_menu(&self) -> bool {
        self.menu.is_some()
    }

    /// Is there a menu prompt related to this entry?
    ///
    /// A prompt index is only meaningful under a menu, so this also
    /// requires one.
    pub fn has_prompt(&self) -> bool {
        self.has_menu() && self.prompt.is_some()
    }

    /// Does a line in the parent entry point at this entry?
    pub fn has_line(&self) -> bool {
        self.line.is_some()
    }
}

/// The fields shared by short and long entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCommon {
    pub(crate) offset: u64,
    pub(crate) parent: EntryParent,
    pub(crate) previous: Option<u64>,
    pub(crate) next: Option<u64>,
    pub(crate) lines: Vec<String>,
}

impl EntryCommon {
    /// The file offset this entry was loaded from.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The parent linkage for this entry.
    pub fn parent(&self) -> &EntryParent {
        &self.parent
    }

    /// The offset of the previous sibling entry, if any.
    pub fn previous(&self) -> Option<u64> {
        self.previous
    }

    /// The offset of the next sibling entry, if any.
    pub fn next(&self) -> Option<u64> {
        self.next
    }

    /// The lines of text in the entry, still carrying their markup.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The number of lines in the entry.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The text of the entry as a single newline-joined string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A short entry: a menu-like list of lines that each jump somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortEntry {
    pub(crate) common: EntryCommon,
    pub(crate) offsets: Vec<Option<u64>>,
}

impl ShortEntry {
    /// The fields shared with long entries.
    pub fn common(&self) -> &EntryCommon {
        &self.common
    }

    /// The jump offset associated with each line, in line order.
    ///
    /// Always exactly as long as [`EntryCommon::lines`].
    pub fn offsets(&self) -> &[Option<u64>] {
        &self.offsets
    }

    /// The lines of the entry paired up with their jump offsets.
    pub fn links(&self) -> impl Iterator<Item = Prompt> + '_ {
        self.common
            .lines
            .iter()
            .zip(self.offsets.iter())
            .map(|(line, &offset)| Prompt::new(line.clone(), offset))
    }
}

/// A long entry: scrollable text with an optional see-also table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongEntry {
    pub(crate) common: EntryCommon,
    pub(crate) see_also: SeeAlso,
}

impl LongEntry {
    /// The fields shared with short entries.
    pub fn common(&self) -> &EntryCommon {
        &self.common
    }

    /// The see-also table; empty when the entry carries none.
    pub fn see_also(&self) -> &SeeAlso {
        &self.see_also
    }

    /// Does this entry have any see-also items?
    pub fn has_see_also(&self) -> bool {
        !self.see_also.is_empty()
    }
}

/// An entry loaded from the guide, in either of its two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Short(ShortEntry),
    Long(LongEntry),
}

impl Entry {
    /// The kind of this entry.
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Short(_) => EntryKind::Short,
            Entry::Long(_) => EntryKind::Long,
        }
    }

    /// The fields shared by both entry shapes.
    pub fn common(&self) -> &EntryCommon {
        match self {
            Entry::Short(entry) => entry.common(),
            Entry::Long(entry) => entry.common(),
        }
    }

    /// The file offset this entry was loaded from.
    pub fn offset(&self) -> u64 {
        self.common().offset()
    }

    /// The parent linkage for this entry.
    pub fn parent(&self) -> &EntryParent {
        self.common().parent()
    }

    /// The lines of text in the entry.
    pub fn lines(&self) -> &[String] {
        self.common().lines()
    }

    /// The offset of the previous sibling entry, if any.
    pub fn previous(&self) -> Option<u64> {
        self.common().previous()
    }

    /// The offset of the next sibling entry, if any.
    pub fn next(&self) -> Option<u64> {
        self.common().next()
    }

    /// Is there a previous sibling entry?
    pub fn has_previous(&self) -> bool {
        self.previous().is_some()
    }

    /// Is there a next sibling entry?
    pub fn has_next(&self) -> bool {
        self.next().is_some()
    }

    /// The text of the entry as a single newline-joined string.
    pub fn text(&self) -> String {
        self.common().text()
    }

    /// This entry as a short entry, if it is one.
    pub fn as_short(&self) -> Option<&ShortEntry> {
        match self {
            Entry::Short(entry) => Some(entry),
            Entry::Long(_) => None,
        }
    }

    /// This entry as a long entry, if it is one.
    pub fn as_long(&self) -> Option<&LongEntry> {
        match self {
            Entry::Short(_) => None,
            Entry::Long(entry) => Some(entry),
        }
    }
}
