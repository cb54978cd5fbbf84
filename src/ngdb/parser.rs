//! Parser for the control-sequence markup inside entry lines.
//!
//! Entry text carries a `^`-escape dialect for colour and attribute
//! changes. This module turns a line into a stream of
//! [`MarkupToken`]s, offers a [`MarkupVisitor`] base for renderers to
//! build on, and ships one concrete renderer: the [`PlainText`]
//! flattener.
//!
//! Real-world guides contain malformed escapes, so the parser never
//! fails: anything it cannot make sense of downgrades to literal text.

use super::codec::cp437;

/// The character that marks an upcoming control sequence.
const CTRL_CHAR: char = '^';

/// One semantic piece of a parsed entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    /// A run of ordinary characters.
    Text(String),
    /// A colour change, split into its two DOS colour nibbles.
    ColourChange { foreground: u8, background: u8 },
    /// An attribute change carrying the raw DOS attribute code.
    ///
    /// Renderers may interpret the code's nibbles as colour bits; no
    /// derived colour token is emitted here.
    AttributeChange(u8),
    /// Reset to normal attributes, clearing every open toggle.
    NormalAttribute,
    BoldOn,
    BoldOff,
    UnderlineOn,
    UnderlineOff,
    ItalicOn,
    ItalicOff,
    ReverseOn,
    ReverseOff,
    /// A raw byte embedded with `^x`, printable or not.
    RawChar(u8),
}

/// The toggle state threaded through one line's parse.
#[derive(Default)]
struct ParseState {
    bold: bool,
    underline: bool,
    italic: bool,
    reverse: bool,
    last_attribute: Option<u8>,
}

/// Parses one entry line into its markup tokens.
///
/// Consecutive ordinary characters coalesce into a single
/// [`MarkupToken::Text`]. Toggle escapes flip per-line boolean state, so
/// a second `^b` closes what the first opened. Malformed input (a
/// trailing `^`, an unknown escape letter, or `^a`/`^c`/`^x` without two
/// hex digits) comes through as literal text.
pub fn parse_markup(line: &str) -> Vec<MarkupToken> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut state = ParseState::default();
    let mut i = 0;

    // Closes the current text run, if any, before a semantic token.
    fn flush(text: &mut String, tokens: &mut Vec<MarkupToken>) {
        if !text.is_empty() {
            tokens.push(MarkupToken::Text(std::mem::take(text)));
        }
    }

    while i < chars.len() {
        let ch = chars[i];
        if ch != CTRL_CHAR {
            text.push(ch);
            i += 1;
            continue;
        }
        let Some(&code) = chars.get(i + 1) else {
            // A lone ^ at the end of the line is just a ^.
            text.push(CTRL_CHAR);
            i += 1;
            continue;
        };
        match code.to_ascii_lowercase() {
            '^' => {
                text.push(CTRL_CHAR);
                i += 2;
            }
            'a' => match hex_pair(&chars, i + 2) {
                Some(attribute) => {
                    flush(&mut text, &mut tokens);
                    // The same attribute twice in a row toggles back to
                    // normal rather than restating itself.
                    if state.last_attribute == Some(attribute) {
                        tokens.push(MarkupToken::NormalAttribute);
                        state.last_attribute = None;
                    } else {
                        tokens.push(MarkupToken::AttributeChange(attribute));
                        state.last_attribute = Some(attribute);
                    }
                    i += 4;
                }
                None => {
                    text.push(CTRL_CHAR);
                    text.push(code);
                    i += 2;
                }
            },
            'c' => match hex_pair(&chars, i + 2) {
                Some(colour) => {
                    flush(&mut text, &mut tokens);
                    tokens.push(MarkupToken::ColourChange {
                        foreground: colour & 0x0F,
                        background: colour >> 4,
                    });
                    i += 4;
                }
                None => {
                    text.push(CTRL_CHAR);
                    text.push(code);
                    i += 2;
                }
            },
            'x' => match hex_pair(&chars, i + 2) {
                Some(byte) => {
                    flush(&mut text, &mut tokens);
                    tokens.push(MarkupToken::RawChar(byte));
                    i += 4;
                }
                None => {
                    text.push(CTRL_CHAR);
                    text.push(code);
                    i += 2;
                }
            },
            'b' => {
                flush(&mut text, &mut tokens);
                state.bold = !state.bold;
                tokens.push(if state.bold { MarkupToken::BoldOn } else { MarkupToken::BoldOff });
                i += 2;
            }
            'u' => {
                flush(&mut text, &mut tokens);
                state.underline = !state.underline;
                tokens.push(if state.underline {
                    MarkupToken::UnderlineOn
                } else {
                    MarkupToken::UnderlineOff
                });
                i += 2;
            }
            'i' => {
                flush(&mut text, &mut tokens);
                state.italic = !state.italic;
                tokens.push(if state.italic {
                    MarkupToken::ItalicOn
                } else {
                    MarkupToken::ItalicOff
                });
                i += 2;
            }
            'r' => {
                flush(&mut text, &mut tokens);
                state.reverse = !state.reverse;
                tokens.push(if state.reverse {
                    MarkupToken::ReverseOn
                } else {
                    MarkupToken::ReverseOff
                });
                i += 2;
            }
            'n' => {
                flush(&mut text, &mut tokens);
                tokens.push(MarkupToken::NormalAttribute);
                state = ParseState::default();
                i += 2;
            }
            _ => {
                // No such escape; keep both characters as text.
                text.push(CTRL_CHAR);
                text.push(code);
                i += 2;
            }
        }
    }
    flush(&mut text, &mut tokens);
    tokens
}

/// Reads two hex digits at `at`, if both are there and valid.
fn hex_pair(chars: &[char], at: usize) -> Option<u8> {
    let high = chars.get(at)?.to_digit(16)?;
    let low = chars.get(at + 1)?.to_digit(16)?;
    Some(((high << 4) | low) as u8)
}

/// The base for markup renderers.
///
/// Every method defaults to doing nothing, so a renderer implements only
/// the tokens it cares about and feeds lines through [`visit_markup`].
pub trait MarkupVisitor {
    /// Handle a run of ordinary text.
    fn text(&mut self, _text: &str) {}
    /// Handle a colour change.
    fn colour_change(&mut self, _foreground: u8, _background: u8) {}
    /// Handle an attribute change.
    fn attribute_change(&mut self, _attribute: u8) {}
    /// Handle a reset to normal attributes.
    fn normal_attribute(&mut self) {}
    fn bold_on(&mut self) {}
    fn bold_off(&mut self) {}
    fn underline_on(&mut self) {}
    fn underline_off(&mut self) {}
    fn italic_on(&mut self) {}
    fn italic_off(&mut self) {}
    fn reverse_on(&mut self) {}
    fn reverse_off(&mut self) {}
    /// Handle a raw embedded byte.
    fn raw_char(&mut self, _byte: u8) {}
}

/// Parses `line` and drives `visitor` with each token in order.
pub fn visit_markup(line: &str, visitor: &mut dyn MarkupVisitor) {
    for token in parse_markup(line) {
        match token {
            MarkupToken::Text(text) => visitor.text(&text),
            MarkupToken::ColourChange { foreground, background } => {
                visitor.colour_change(foreground, background)
            }
            MarkupToken::AttributeChange(attribute) => visitor.attribute_change(attribute),
            MarkupToken::NormalAttribute => visitor.normal_attribute(),
            MarkupToken::BoldOn => visitor.bold_on(),
            MarkupToken::BoldOff => visitor.bold_off(),
            MarkupToken::UnderlineOn => visitor.underline_on(),
            MarkupToken::UnderlineOff => visitor.underline_off(),
            MarkupToken::ItalicOn => visitor.italic_on(),
            MarkupToken::ItalicOff => visitor.italic_off(),
            MarkupToken::ReverseOn => visitor.reverse_on(),
            MarkupToken::ReverseOff => visitor.reverse_off(),
            MarkupToken::RawChar(byte) => visitor.raw_char(byte),
        }
    }
}

/// Flattens markup to its bare text.
///
/// Colour, attribute, and toggle tokens are dropped; text runs and raw
/// characters, put through the DOS code-page like any other byte, are
/// concatenated.
#[derive(Debug, Default)]
pub struct PlainText {
    text: String,
}

impl PlainText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a whole line in one call.
    pub fn from_line(line: &str) -> Self {
        let mut flattener = Self::new();
        visit_markup(line, &mut flattener);
        flattener
    }

    /// The text accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the flattener, returning its text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl MarkupVisitor for PlainText {
    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn raw_char(&mut self, byte: u8) {
        self.text.push(cp437::decode_byte(byte));
    }
}

impl std::fmt::Display for PlainText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parses `line` and returns its plain-text flattening.
pub fn plain_text(line: &str) -> String {
    PlainText::from_line(line).into_string()
}

#[cfg(test)]
mod tests {
    use super::MarkupToken::*;
    use super::*;

    #[test]
    fn unmarked_text_is_one_run() {
        assert_eq!(parse_markup("hello world"), vec![Text("hello world".into())]);
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert_eq!(parse_markup(""), Vec::new());
    }

    #[test]
    fn caret_escapes_itself() {
        assert_eq!(parse_markup("a^^b"), vec![Text("a^b".into())]);
    }

    #[test]
    fn trailing_caret_is_literal() {
        assert_eq!(parse_markup("dangling^"), vec![Text("dangling^".into())]);
    }

    #[test]
    fn bold_toggles_around_text() {
        assert_eq!(
            parse_markup("^byes^b"),
            vec![BoldOn, Text("yes".into()), BoldOff]
        );
        assert_eq!(plain_text("^byes^b"), "yes");
    }

    #[test]
    fn every_toggle_pairs_on_then_off() {
        assert_eq!(parse_markup("^u_^u"), vec![UnderlineOn, Text("_".into()), UnderlineOff]);
        assert_eq!(parse_markup("^i/^i"), vec![ItalicOn, Text("/".into()), ItalicOff]);
        assert_eq!(parse_markup("^r!^r"), vec![ReverseOn, Text("!".into()), ReverseOff]);
    }

    #[test]
    fn colour_splits_into_nibbles() {
        assert_eq!(
            parse_markup("^cf0RED^c07"),
            vec![
                ColourChange { foreground: 0x0, background: 0xF },
                Text("RED".into()),
                ColourChange { foreground: 0x7, background: 0x0 },
            ]
        );
        assert_eq!(plain_text("^cf0RED^c07"), "RED");
    }

    #[test]
    fn attribute_carries_its_code() {
        assert_eq!(
            parse_markup("^a1edone"),
            vec![AttributeChange(0x1E), Text("done".into())]
        );
    }

    #[test]
    fn repeated_attribute_toggles_back_to_normal() {
        assert_eq!(
            parse_markup("^a70mid^a70"),
            vec![AttributeChange(0x70), Text("mid".into()), NormalAttribute]
        );
    }

    #[test]
    fn raw_char_interrupts_the_text_run() {
        assert_eq!(
            parse_markup("a^xFFb"),
            vec![Text("a".into()), RawChar(0xFF), Text("b".into())]
        );
        assert_eq!(plain_text("a^xFFb"), format!("a{}b", '\u{00A0}'));
    }

    #[test]
    fn normal_resets_toggle_state() {
        // The ^b after ^n opens bold again rather than closing it.
        assert_eq!(
            parse_markup("^bx^ny^bz"),
            vec![
                BoldOn,
                Text("x".into()),
                NormalAttribute,
                Text("y".into()),
                BoldOn,
                Text("z".into()),
            ]
        );
    }

    #[test]
    fn malformed_hex_downgrades_to_text() {
        assert_eq!(parse_markup("^aZZ"), vec![Text("^aZZ".into())]);
        assert_eq!(parse_markup("see ^c please"), vec![Text("see ^c please".into())]);
        assert_eq!(parse_markup("^x0"), vec![Text("^x0".into())]);
        assert_eq!(plain_text("^cq0RED"), "^cq0RED");
    }

    #[test]
    fn unknown_escape_keeps_both_characters() {
        assert_eq!(parse_markup("a^zb"), vec![Text("a^zb".into())]);
    }

    #[test]
    fn upper_case_escapes_match_lower_case() {
        assert_eq!(parse_markup("^Byes^B"), parse_markup("^byes^b"));
        assert_eq!(parse_markup("^CF0x"), parse_markup("^cf0x"));
    }

    /// Flattens a token stream the long way round, for comparison.
    fn flatten(tokens: &[MarkupToken]) -> String {
        let mut out = String::new();
        for token in tokens {
            match token {
                Text(text) => out.push_str(text),
                RawChar(byte) => out.push(cp437::decode_byte(*byte)),
                _ => {}
            }
        }
        out
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: lines without the control character flatten to
            /// themselves.
            #[test]
            fn control_free_lines_are_identity(
                line in "[^^]{0,256}"
            ) {
                prop_assert_eq!(plain_text(&line), line);
            }

            /// Property: the flattener agrees with dropping every token
            /// except text and raw characters.
            #[test]
            fn flattener_matches_token_stream(
                line in "[a-z ^ABCINRUXbcinrux0-9F]{0,256}"
            ) {
                prop_assert_eq!(plain_text(&line), flatten(&parse_markup(&line)));
            }
        }
    }
}
