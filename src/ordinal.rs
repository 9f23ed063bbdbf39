//! Sub-course ordinal extraction.
//!
//! A course's position inside its program is not an LMS field; it is read
//! out of free text. Strategies run in priority order and the first one that
//! matches wins. Fields are tried in the same way: the SIS id first, then the
//! course code. The display name is never consulted.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::Ordinal;

/// One way of reading an ordinal out of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrdinalPattern {
    /// Hyphen-delimited segment such as `DIP-2024-C3-A` (case-sensitive `C`).
    SegmentCode,
    /// Spanish label such as `Curso 2` or `Curso2` (case-sensitive).
    CursoLabel,
}

/// Default strategy order.
pub const DEFAULT_PATTERNS: [OrdinalPattern; 2] =
    [OrdinalPattern::SegmentCode, OrdinalPattern::CursoLabel];

impl OrdinalPattern {
    fn regex(self) -> &'static Regex {
        static SEGMENT: OnceLock<Regex> = OnceLock::new();
        static CURSO: OnceLock<Regex> = OnceLock::new();
        match self {
            OrdinalPattern::SegmentCode => SEGMENT
                .get_or_init(|| Regex::new(r"-C([0-9]+)-").expect("segment ordinal regex")),
            OrdinalPattern::CursoLabel => CURSO
                .get_or_init(|| Regex::new(r"Curso\s*([0-9]+)").expect("curso ordinal regex")),
        }
    }

    /// Apply this strategy to `text`.
    ///
    /// A match always yields an ordinal; digits too large for [`Ordinal`]
    /// saturate to `Ordinal::MAX` so later strategies are not consulted.
    pub fn extract(self, text: &str) -> Option<Ordinal> {
        self.regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|digits| digits.as_str().parse::<Ordinal>().unwrap_or(Ordinal::MAX))
    }
}

/// Extract an ordinal using [`DEFAULT_PATTERNS`].
pub fn extract_ordinal(text: &str) -> Option<Ordinal> {
    extract_with(&DEFAULT_PATTERNS, text)
}

/// Extract an ordinal using `patterns` in order; first hit wins.
pub fn extract_with(patterns: &[OrdinalPattern], text: &str) -> Option<Ordinal> {
    patterns.iter().find_map(|pattern| pattern.extract(text))
}

/// Derive a course ordinal from its SIS id, falling back to its course code.
pub fn derive_ordinal(external_id: &str, code: &str) -> Option<Ordinal> {
    [external_id, code]
        .into_iter()
        .find_map(extract_ordinal)
}
