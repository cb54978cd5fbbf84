//! Run-length expansion for guide text fields.
//!
//! Menu titles, prompts, and entry lines store repeated bytes as a
//! three-byte sequence: the marker `0xFF`, a count, and the byte to
//! repeat. Real-world guides contain truncated runs (a lone marker at
//! the end of a field, or a marker and count with no value byte) and
//! those must expand to nothing rather than fail.

/// The byte value that marks the start of a run.
pub const RLE_MARKER: u8 = 0xFF;

/// Expands all run-length-encoded sequences in `data`.
///
/// Bytes other than [`RLE_MARKER`] are passed through untouched, so any
/// input without a marker expands to itself.
pub fn expand(data: &[u8]) -> Vec<u8> {
    let mut expanded = Vec::with_capacity(data.len());
    let mut input = data.iter();
    while let Some(&byte) = input.next() {
        if byte != RLE_MARKER {
            expanded.push(byte);
            continue;
        }
        // A truncated run at the end of the field expands to nothing.
        let (Some(&count), Some(&value)) = (input.next(), input.next()) else {
            break;
        };
        expanded.extend(std::iter::repeat(value).take(count as usize));
    }
    expanded
}
