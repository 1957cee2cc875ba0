//! Character set detection and conversion for the text view.
//!
//! Detection only looks at a byte-order mark. Anything without one is
//! treated as the configured single-byte fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::{AppError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// windows-1252 code points for bytes 0x80..=0x9F. `None` marks bytes the
/// code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

/// Charsets usable when a resource carries no byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SingleByteCharset {
    /// ISO-8859-1. Every byte maps to a code point, so decoding never fails.
    #[default]
    Latin1,
    Windows1252,
    Ascii,
}

impl SingleByteCharset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Windows1252 => "windows-1252",
            Self::Ascii => "US-ASCII",
        }
    }

    fn decode_byte(self, byte: u8) -> Option<char> {
        match self {
            Self::Latin1 => Some(char::from(byte)),
            Self::Ascii => byte.is_ascii().then(|| char::from(byte)),
            Self::Windows1252 => match byte {
                0x80..=0x9F => CP1252_HIGH[usize::from(byte - 0x80)],
                _ => Some(char::from(byte)),
            },
        }
    }

    fn encode_char(self, ch: char) -> Option<u8> {
        let code = u32::from(ch);
        match self {
            Self::Latin1 => u8::try_from(code).ok(),
            Self::Ascii => ch.is_ascii().then_some(code as u8),
            Self::Windows1252 => match code {
                0x00..=0x7F | 0xA0..=0xFF => Some(code as u8),
                _ => CP1252_HIGH
                    .iter()
                    .position(|c| *c == Some(ch))
                    .map(|idx| 0x80 + idx as u8),
            },
        }
    }
}

/// The charset picked for one text load. It is pinned for every later
/// encode of that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsetGuess {
    Utf8,
    Utf16Be,
    Utf16Le,
    SingleByte(SingleByteCharset),
}

impl CharsetGuess {
    /// Inspect the byte-order mark at the start of `data`.
    pub fn detect(data: &[u8], fallback: SingleByteCharset) -> Self {
        if data.starts_with(&UTF8_BOM) {
            Self::Utf8
        } else if data.starts_with(&UTF16BE_BOM) {
            Self::Utf16Be
        } else if data.starts_with(&UTF16LE_BOM) {
            Self::Utf16Le
        } else {
            Self::SingleByte(fallback)
        }
    }

    pub fn bom(&self) -> &'static [u8] {
        match self {
            Self::Utf8 => &UTF8_BOM,
            Self::Utf16Be => &UTF16BE_BOM,
            Self::Utf16Le => &UTF16LE_BOM,
            Self::SingleByte(_) => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::SingleByte(cs) => cs.name(),
        }
    }

    /// Decode `data`, dropping a leading byte-order mark of this charset.
    ///
    /// Decoding is strict: malformed input fails instead of being replaced,
    /// so nothing is silently altered on the way into the editor.
    pub fn decode(self, data: &[u8]) -> Result<String> {
        let body = data.strip_prefix(self.bom()).unwrap_or(data);
        match self {
            Self::Utf8 => String::from_utf8(body.to_vec()).map_err(|e| AppError::Decode {
                charset: self,
                reason: e.utf8_error().to_string(),
            }),
            Self::Utf16Be | Self::Utf16Le => self.decode_utf16(body),
            Self::SingleByte(cs) => body
                .iter()
                .enumerate()
                .map(|(offset, &byte)| {
                    cs.decode_byte(byte).ok_or_else(|| AppError::Decode {
                        charset: self,
                        reason: format!("byte {:#04x} at offset {} is undefined", byte, offset),
                    })
                })
                .collect(),
        }
    }

    fn decode_utf16(self, body: &[u8]) -> Result<String> {
        if body.len() % 2 != 0 {
            return Err(AppError::Decode {
                charset: self,
                reason: format!("odd number of bytes ({})", body.len()),
            });
        }
        let units = body.chunks_exact(2).map(|pair| match self {
            Self::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
            _ => u16::from_le_bytes([pair[0], pair[1]]),
        });
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|e| AppError::Decode {
                charset: self,
                reason: e.to_string(),
            })
    }

    /// Encode `text`, re-emitting the byte-order mark for Unicode charsets.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.bom().len() + text.len());
        out.extend_from_slice(self.bom());
        match self {
            Self::Utf8 => out.extend_from_slice(text.as_bytes()),
            Self::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
            Self::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
            Self::SingleByte(cs) => {
                for (idx, ch) in text.chars().enumerate() {
                    let byte = cs.encode_char(ch).ok_or_else(|| AppError::Encode {
                        charset: self,
                        reason: format!("character {:?} at position {} is not representable", ch, idx),
                    })?;
                    out.push(byte);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for CharsetGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
