use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::char_info::CharInfo;

/// How a single mismatched position is categorized.
///
/// Classification priority is a hard contract, evaluated top to bottom:
/// emptiness first, then the whitespace-pair check, then single-side
/// whitespace, then the non-ASCII check, else plain substitution. A
/// character that is both non-ASCII and whitespace (e.g. U+00A0) therefore
/// always classifies via the whitespace rules, never as `UnicodeDifference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Right has a character where left already ended.
    Insertion,
    /// Left has a character where right already ended.
    Deletion,
    /// Both sides are whitespace, but different whitespace.
    WhitespaceSubstitution,
    /// Exactly one side is whitespace.
    WhitespaceDifference,
    /// Either side is non-ASCII and no whitespace rule applied.
    UnicodeDifference,
    /// Plain ASCII, neither side whitespace.
    CharacterSubstitution,
}

impl DiffKind {
    /// Stable textual name, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            DiffKind::Insertion => "insertion",
            DiffKind::Deletion => "deletion",
            DiffKind::WhitespaceSubstitution => "whitespace_substitution",
            DiffKind::WhitespaceDifference => "whitespace_difference",
            DiffKind::UnicodeDifference => "unicode_difference",
            DiffKind::CharacterSubstitution => "character_substitution",
        }
    }
}

/// One mismatched position in a pairwise string comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharDifference {
    /// 0-based code-point index into the compared strings.
    pub position: usize,
    pub left: Option<char>,
    pub right: Option<char>,
    pub left_info: Option<CharInfo>,
    pub right_info: Option<CharInfo>,
    pub kind: DiffKind,
}

/// A reportable character found while scanning a single string in isolation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportableChar {
    pub position: usize,
    pub info: CharInfo,
}

/// Outcome of trying to encode a string with one encoding.
///
/// Auxiliary diagnostic only — never consulted by comparison decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingProbe {
    pub encoding: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full character-level account of how two strings differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringDiffReport {
    pub are_equal: bool,
    /// Lengths in code points, matching the positional index space.
    pub left_len: usize,
    pub right_len: usize,
    /// `right_len - left_len`.
    pub length_delta: i64,
    pub differences: Vec<CharDifference>,
    pub kind_counts: BTreeMap<DiffKind, usize>,
    pub left_reportable: Vec<ReportableChar>,
    pub right_reportable: Vec<ReportableChar>,
    pub left_encodings: Vec<EncodingProbe>,
    pub right_encodings: Vec<EncodingProbe>,
}

impl StringDiffReport {
    /// Positions of all mismatches, in order.
    pub fn positions(&self) -> Vec<usize> {
        self.differences.iter().map(|d| d.position).collect()
    }
}

/// Compare two strings position by position and report every mismatch.
///
/// This is a fixed-offset comparison over `[0, max(len))`: there is no
/// realignment and no edit distance. Once the strings diverge in length,
/// every following index is compared at the shifted offset and usually
/// reported as a mismatch even when the suffixes match. That over-reporting
/// is deliberate — the tool targets near-identical inputs where positional
/// precision matters more than a minimal edit script — and downstream
/// reports depend on the exact positions, so it must not be replaced with a
/// sequence-alignment diff.
pub fn diff(left: &str, right: &str) -> StringDiffReport {
    let l: Vec<char> = left.chars().collect();
    let r: Vec<char> = right.chars().collect();
    let max_len = l.len().max(r.len());

    let mut differences = Vec::new();
    for position in 0..max_len {
        let a = l.get(position).copied();
        let b = r.get(position).copied();
        if a != b {
            differences.push(CharDifference {
                position,
                left: a,
                right: b,
                left_info: a.map(CharInfo::of),
                right_info: b.map(CharInfo::of),
                kind: classify(a, b),
            });
        }
    }

    let mut kind_counts: BTreeMap<DiffKind, usize> = BTreeMap::new();
    for d in &differences {
        *kind_counts.entry(d.kind).or_insert(0) += 1;
    }

    StringDiffReport {
        are_equal: left == right,
        left_len: l.len(),
        right_len: r.len(),
        length_delta: r.len() as i64 - l.len() as i64,
        differences,
        kind_counts,
        left_reportable: scan_reportable(left),
        right_reportable: scan_reportable(right),
        left_encodings: probe_encodings(left),
        right_encodings: probe_encodings(right),
    }
}

fn classify(left: Option<char>, right: Option<char>) -> DiffKind {
    match (left, right) {
        (None, Some(_)) => DiffKind::Insertion,
        (Some(_), None) => DiffKind::Deletion,
        (Some(a), Some(b)) => {
            if a.is_whitespace() && b.is_whitespace() {
                DiffKind::WhitespaceSubstitution
            } else if a.is_whitespace() || b.is_whitespace() {
                DiffKind::WhitespaceDifference
            } else if !a.is_ascii() || !b.is_ascii() {
                DiffKind::UnicodeDifference
            } else {
                DiffKind::CharacterSubstitution
            }
        }
        (None, None) => unreachable!("a recorded difference always has at least one side"),
    }
}

/// Scan a single string and collect every reportable character with its
/// position. Unrelated to the pairwise diff above.
pub fn scan_reportable(text: &str) -> Vec<ReportableChar> {
    text.chars()
        .enumerate()
        .filter_map(|(position, c)| {
            let info = CharInfo::of(c);
            info.reportable.then_some(ReportableChar { position, info })
        })
        .collect()
}

/// Fixed ordered list of encodings probed for every compared string.
const PROBED_ENCODINGS: [&str; 5] = ["utf-8", "ascii", "latin-1", "windows-1252", "gbk"];

/// Try each probe encoding against `text`, recording success and byte length
/// or the reason it cannot represent the string.
pub fn probe_encodings(text: &str) -> Vec<EncodingProbe> {
    PROBED_ENCODINGS
        .iter()
        .map(|&encoding| match encoding {
            "utf-8" => EncodingProbe {
                encoding,
                success: true,
                byte_length: Some(text.len()),
                error: None,
            },
            "ascii" => probe_by_scalar_limit(encoding, text, 0x7F),
            "latin-1" => probe_by_scalar_limit(encoding, text, 0xFF),
            "windows-1252" => probe_with(encoding, encoding_rs::WINDOWS_1252, text),
            "gbk" => probe_with(encoding, encoding_rs::GBK, text),
            _ => unreachable!("probe list is fixed"),
        })
        .collect()
}

/// ASCII and latin-1 are single-byte identity mappings up to a scalar limit,
/// so the probe is a scan rather than a real encoder round-trip.
fn probe_by_scalar_limit(encoding: &'static str, text: &str, max: u32) -> EncodingProbe {
    match text.chars().position(|c| c as u32 > max) {
        None => EncodingProbe {
            encoding,
            success: true,
            byte_length: Some(text.chars().count()),
            error: None,
        },
        Some(position) => {
            let c = text.chars().nth(position).unwrap_or('\u{FFFD}');
            EncodingProbe {
                encoding,
                success: false,
                byte_length: None,
                error: Some(format!("cannot encode {c:?} at position {position}")),
            }
        }
    }
}

fn probe_with(
    encoding: &'static str,
    codec: &'static encoding_rs::Encoding,
    text: &str,
) -> EncodingProbe {
    let (bytes, _, had_errors) = codec.encode(text);
    if had_errors {
        EncodingProbe {
            encoding,
            success: false,
            byte_length: None,
            error: Some(format!("contains characters outside the {encoding} repertoire")),
        }
    } else {
        EncodingProbe {
            encoding,
            success: true,
            byte_length: Some(bytes.len()),
            error: None,
        }
    }
}
