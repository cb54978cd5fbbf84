//! Sequential iteration over a guide's entries.

use super::guide::Guide;
use super::types::error::{NgdbError, Result};
use super::types::models::Entry;

/// Where the iterator is within the walk.
enum State {
    /// Not yet started; the first `next` call rewinds to the first entry.
    Start,
    /// An entry at this offset has been yielded; resume past it.
    After(u64),
    /// Finished, cleanly or by error.
    Done,
}

/// Iterator over every entry in a guide.
///
/// Created by [`Guide::entries`]. Yields `Result<Entry>` so a corrupt
/// record surfaces as an item rather than a panic; iteration stops after
/// the first error.
///
/// Each step repositions to the entry it last yielded before skipping,
/// so a caller that navigates the guide while consuming the iterator
/// cannot derail it.
pub struct Entries<'a> {
    guide: &'a mut Guide,
    state: State,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(guide: &'a mut Guide) -> Self {
        Self { guide, state: State::Start }
    }

    /// Loads the entry at the current position, updating the walk state.
    fn load_current(&mut self) -> Option<Result<Entry>> {
        if self.guide.eof() {
            self.state = State::Done;
            return None;
        }
        match self.guide.load() {
            Ok(entry) => {
                self.state = State::After(entry.offset());
                Some(Ok(entry))
            }
            Err(NgdbError::Eof) => {
                self.state = State::Done;
                None
            }
            Err(error) => {
                self.state = State::Done;
                Some(Err(error))
            }
        }
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Start => {
                // A file that is not a guide has no entries to offer.
                if self.guide.goto_first().is_err() {
                    self.state = State::Done;
                    return None;
                }
                self.load_current()
            }
            State::After(offset) => {
                self.guide.goto(offset);
                match self.guide.skip() {
                    Ok(_) => self.load_current(),
                    Err(NgdbError::Eof) => {
                        self.state = State::Done;
                        None
                    }
                    Err(error) => {
                        self.state = State::Done;
                        Some(Err(error))
                    }
                }
            }
        }
    }
}
