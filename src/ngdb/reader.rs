//! Low-level random-access reading of a guide file.
//!
//! [`GuideReader`] owns the file handle and the current read position,
//! and decodes the on-disk primitive types: little-endian integers,
//! fixed-width strings, and run-length-expanded strings. Every byte it
//! hands out has been put through the guide obfuscation transform; the
//! only exception is the raw probe used for the magic bytes.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use super::codec::{cp437, crypto, rle};
use super::types::error::{NgdbError, Result};

/// A line length prefix that reads as 0xFFFF means an empty line.
const EMPTY_LENGTH: u16 = 0xFFFF;

/// The byte cursor over an open guide file.
pub struct GuideReader {
    file: File,
    pos: u64,
}

impl GuideReader {
    /// Opens the guide file at `path`, positioned at byte zero.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file, pos: 0 })
    }

    /// The size of the underlying file in bytes.
    pub fn file_size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// The current byte position within the file.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Moves to an absolute byte position.
    ///
    /// Positions at or past the end of the file are legal; reads from
    /// there fail with [`NgdbError::Eof`].
    pub fn seek(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Moves relative to the current position.
    pub fn skip(&mut self, count: i64) {
        self.pos = self.pos.saturating_add_signed(count);
    }

    /// Releases the file handle.
    pub fn close(self) {}

    /// Reads exactly `buf.len()` bytes without applying the obfuscation
    /// transform.
    fn read_exact_raw(&mut self, buf: &mut [u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(self.pos))?;
        self.file.read_exact(buf).map_err(|error| {
            if error.kind() == ErrorKind::UnexpectedEof {
                NgdbError::Eof
            } else {
                NgdbError::Io(error)
            }
        })?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Reads `count` raw bytes; used for the magic probe only.
    pub(crate) fn read_raw_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_exact_raw(&mut buf)?;
        Ok(buf)
    }

    /// Reads `count` bytes, deobfuscated.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_exact_raw(&mut buf)?;
        crypto::decrypt_in_place(&mut buf);
        Ok(buf)
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_raw(&mut buf)?;
        Ok(crypto::decrypt(buf[0]))
    }

    /// Reads a two-byte little-endian word.
    pub fn read_word(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_raw(&mut buf)?;
        crypto::decrypt_in_place(&mut buf);
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Reads a four-byte little-endian unsigned long.
    pub fn read_dword(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_raw(&mut buf)?;
        crypto::decrypt_in_place(&mut buf);
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Reads a four-byte little-endian signed long.
    pub fn read_long(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact_raw(&mut buf)?;
        crypto::decrypt_in_place(&mut buf);
        Ok(LittleEndian::read_i32(&buf))
    }

    /// Reads an offset value.
    ///
    /// Offsets are stored as signed longs where anything negative means
    /// "there is no offset"; that sentinel never escapes this method.
    pub fn read_offset(&mut self) -> Result<Option<u64>> {
        let offset = self.read_long()?;
        Ok((offset >= 0).then_some(offset as u64))
    }

    /// Reads a byte without moving the position.
    pub fn peek_byte(&mut self) -> Result<u8> {
        let pos = self.pos;
        let result = self.read_byte();
        self.pos = pos;
        result
    }

    /// Reads a word without moving the position.
    pub fn peek_word(&mut self) -> Result<u16> {
        let pos = self.pos;
        let result = self.read_word();
        self.pos = pos;
        result
    }

    /// Reads a fixed-width string of `length` bytes.
    ///
    /// The logical string ends at the first NUL or 0xFF byte after
    /// deobfuscation; the position always advances by `length`.
    pub fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        let end = bytes
            .iter()
            .position(|&byte| byte == 0 || byte == rle::RLE_MARKER)
            .unwrap_or(bytes.len());
        Ok(cp437::decode(&bytes[..end]))
    }

    /// Reads a fixed-width string and expands its run-length encoding.
    ///
    /// Only NUL terminates the logical string here; 0xFF is the RLE
    /// marker and is consumed by the expansion.
    pub fn read_string_expanded(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        let end = bytes
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(bytes.len());
        Ok(cp437::decode(&rle::expand(&bytes[..end])))
    }

    /// Reads a word-length-prefixed, run-length-expanded string.
    ///
    /// Real guides contain the length 0xFFFF for some lines; those read
    /// as empty without consuming any text bytes.
    pub fn read_prefixed_string(&mut self) -> Result<String> {
        let length = self.read_word()?;
        if length == EMPTY_LENGTH {
            trace!("Empty-sentinel string length at {:#x}", self.pos);
            return Ok(String::new());
        }
        self.read_string_expanded(length as usize)
    }
}

impl std::fmt::Debug for GuideReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuideReader").field("pos", &self.pos).finish()
    }
}
