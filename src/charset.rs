//! ECI charset records and Byte-segment text decoding
//!
//! An ECI designator switches the interpretation of the following Byte
//! segment. Identifiers map to canonical charset names; the actual decoding
//! is delegated to `encoding_rs`. Identifiers without a canonical name, and
//! names `encoding_rs` cannot represent, fall back to a three-candidate
//! sniff over ISO-8859-1, Shift_JIS and UTF-8.

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8, WINDOWS_1252};
use log::debug;

/// Parsed ECI designator: an identifier in 0..=999999 plus the canonical
/// charset name when the identifier is a recognized assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EciCharset {
    id: u32,
    name: Option<&'static str>,
}

impl EciCharset {
    /// Build the charset record for an ECI identifier
    pub fn from_id(id: u32) -> Self {
        Self {
            id,
            name: canonical_name(id),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Canonical charset name, or None for unassigned/reserved identifiers
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Resolve the canonical name to an encoding.
    ///
    /// Returns None both for nameless records and for names outside the
    /// Encoding Standard (CP437); Byte segments then use detection instead.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.name.and_then(|n| Encoding::for_label(n.as_bytes()))
    }
}

/// Canonical charset names for the recognized ECI assignments
fn canonical_name(id: u32) -> Option<&'static str> {
    match id {
        0 | 2 => Some("CP437"),
        1 | 3 => Some("ISO-8859-1"),
        4 => Some("ISO-8859-2"),
        5 => Some("ISO-8859-3"),
        6 => Some("ISO-8859-4"),
        7 => Some("ISO-8859-5"),
        8 => Some("ISO-8859-6"),
        9 => Some("ISO-8859-7"),
        10 => Some("ISO-8859-8"),
        11 => Some("ISO-8859-9"),
        12 => Some("ISO-8859-10"),
        13 => Some("ISO-8859-11"),
        // 14 is reserved
        15 => Some("ISO-8859-13"),
        20 => Some("Shift_JIS"),
        21 => Some("windows-1250"),
        22 => Some("windows-1251"),
        23 => Some("windows-1252"),
        24 => Some("windows-1253"),
        25 => Some("windows-1254"),
        26 => Some("UTF-8"),
        27 | 170 => Some("US-ASCII"),
        28 => Some("Big5"),
        29 => Some("GB18030"),
        30 => Some("EUC-KR"),
        _ => None,
    }
}

/// Decode the bytes of one Byte segment into text.
///
/// Uses the declared charset when one resolves to an encoding; otherwise
/// sniffs among UTF-8, Shift_JIS and ISO-8859-1. The final fallback never
/// fails: every byte sequence is valid Latin-1-compatible input.
pub fn decode_bytes(bytes: &[u8], charset: Option<EciCharset>) -> String {
    if let Some(encoding) = charset.and_then(|c| c.encoding()) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    if let Some(charset) = charset {
        debug!(
            "no usable encoding for ECI {} ({:?}), falling back to detection",
            charset.id(),
            charset.name()
        );
    }

    // Strict UTF-8 first: valid UTF-8 is very unlikely by accident
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text.into_owned();
    }
    // Then strict Shift_JIS
    if let Some(text) = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes) {
        return text.into_owned();
    }
    // ISO-8859-1 accepts anything
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}
