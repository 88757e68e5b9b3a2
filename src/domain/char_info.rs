use phf::phf_map;
use serde::Serialize;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Curated aliases for characters that are either invisible or visually
/// ambiguous with a plain ASCII character. A character in this table is
/// always flagged [`CharInfo::reportable`], even when it renders (an en dash
/// looks like `-` but is a different code point — exactly the kind of
/// difference this tool exists to surface).
static CURATED: phf::Map<char, &'static str> = phf_map! {
    // ASCII control whitespace
    '\t' => "tab",
    '\n' => "line feed",
    '\u{000B}' => "vertical tab",
    '\u{000C}' => "form feed",
    '\r' => "carriage return",

    // Unicode whitespace variants
    '\u{00A0}' => "no-break space",
    '\u{2000}' => "en quad",
    '\u{2001}' => "em quad",
    '\u{2002}' => "en space",
    '\u{2003}' => "em space",
    '\u{2004}' => "three-per-em space",
    '\u{2005}' => "four-per-em space",
    '\u{2006}' => "six-per-em space",
    '\u{2007}' => "figure space",
    '\u{2008}' => "punctuation space",
    '\u{2009}' => "thin space",
    '\u{200A}' => "hair space",
    '\u{200B}' => "zero width space",
    '\u{200C}' => "zero width non-joiner",
    '\u{200D}' => "zero width joiner",
    '\u{2028}' => "line separator",
    '\u{2029}' => "paragraph separator",
    '\u{202F}' => "narrow no-break space",
    '\u{205F}' => "medium mathematical space",
    '\u{3000}' => "ideographic space",

    // Hyphen/dash look-alikes
    '\u{2010}' => "hyphen",
    '\u{2011}' => "non-breaking hyphen",
    '\u{2012}' => "figure dash",
    '\u{2013}' => "en dash",
    '\u{2014}' => "em dash",
    '\u{2015}' => "horizontal bar",

    // Quotation-mark look-alikes
    '\u{2018}' => "left single quotation mark",
    '\u{2019}' => "right single quotation mark",
    '\u{201A}' => "single low-9 quotation mark",
    '\u{201B}' => "single high-reversed-9 quotation mark",
    '\u{201C}' => "left double quotation mark",
    '\u{201D}' => "right double quotation mark",
    '\u{201E}' => "double low-9 quotation mark",
    '\u{201F}' => "double high-reversed-9 quotation mark",
};

/// Everything cellscope knows about a single character.
///
/// Derived purely from the character; recomputed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharInfo {
    pub character: char,
    pub code_point: u32,
    /// `U+XXXX` notation, zero-padded to at least four digits.
    pub hex: String,
    /// Unicode general category as the two-letter code (`Lu`, `Zs`, `Cc`, …).
    pub category: String,
    /// Curated alias if the character is in the look-alike table, else the
    /// Unicode database name, else `"UNKNOWN"` (unassigned / private use).
    pub name: String,
    pub is_printable: bool,
    pub is_whitespace: bool,
    pub is_control: bool,
    /// True when the character should be called out in reports: either it is
    /// not printable, or it is in the curated look-alike table.
    pub reportable: bool,
}

impl CharInfo {
    /// Classify a single character. Total over any Unicode scalar value.
    pub fn of(character: char) -> Self {
        let code_point = character as u32;
        let category = get_general_category(character);

        let name = match CURATED.get(&character) {
            Some(alias) => (*alias).to_string(),
            None => unicode_names2::name(character)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
        };

        let is_printable = printable(character, category);

        CharInfo {
            character,
            code_point,
            hex: format!("U+{code_point:04X}"),
            category: category_code(category).to_string(),
            name,
            is_printable,
            is_whitespace: character.is_whitespace(),
            is_control: is_c_category(category),
            reportable: !is_printable || CURATED.contains_key(&character),
        }
    }
}

/// Whether the character is in the curated look-alike table.
pub fn is_curated(character: char) -> bool {
    CURATED.contains_key(&character)
}

/// A character is printable unless it falls in a control, format, separator
/// or unassigned category. U+0020 is the one separator that stays printable.
fn printable(character: char, category: GeneralCategory) -> bool {
    if character == ' ' {
        return true;
    }
    !matches!(
        category,
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
    )
}

fn is_c_category(category: GeneralCategory) -> bool {
    matches!(
        category,
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

fn category_code(category: GeneralCategory) -> &'static str {
    match category {
        GeneralCategory::UppercaseLetter => "Lu",
        GeneralCategory::LowercaseLetter => "Ll",
        GeneralCategory::TitlecaseLetter => "Lt",
        GeneralCategory::ModifierLetter => "Lm",
        GeneralCategory::OtherLetter => "Lo",
        GeneralCategory::NonspacingMark => "Mn",
        GeneralCategory::SpacingMark => "Mc",
        GeneralCategory::EnclosingMark => "Me",
        GeneralCategory::DecimalNumber => "Nd",
        GeneralCategory::LetterNumber => "Nl",
        GeneralCategory::OtherNumber => "No",
        GeneralCategory::ConnectorPunctuation => "Pc",
        GeneralCategory::DashPunctuation => "Pd",
        GeneralCategory::OpenPunctuation => "Ps",
        GeneralCategory::ClosePunctuation => "Pe",
        GeneralCategory::InitialPunctuation => "Pi",
        GeneralCategory::FinalPunctuation => "Pf",
        GeneralCategory::OtherPunctuation => "Po",
        GeneralCategory::MathSymbol => "Sm",
        GeneralCategory::CurrencySymbol => "Sc",
        GeneralCategory::ModifierSymbol => "Sk",
        GeneralCategory::OtherSymbol => "So",
        GeneralCategory::SpaceSeparator => "Zs",
        GeneralCategory::LineSeparator => "Zl",
        GeneralCategory::ParagraphSeparator => "Zp",
        GeneralCategory::Control => "Cc",
        GeneralCategory::Format => "Cf",
        GeneralCategory::Surrogate => "Cs",
        GeneralCategory::PrivateUse => "Co",
        GeneralCategory::Unassigned => "Cn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_letter() {
        let info = CharInfo::of('a');
        assert_eq!(info.code_point, 0x61);
        assert_eq!(info.hex, "U+0061");
        assert_eq!(info.category, "Ll");
        assert_eq!(info.name, "LATIN SMALL LETTER A");
        assert!(info.is_printable);
        assert!(!info.is_whitespace);
        assert!(!info.is_control);
        assert!(!info.reportable);
    }

    #[test]
    fn ordinary_space_is_printable_and_not_reportable() {
        let info = CharInfo::of(' ');
        assert!(info.is_printable);
        assert!(info.is_whitespace);
        assert!(!info.reportable);
    }

    #[test]
    fn no_break_space_uses_curated_alias() {
        let info = CharInfo::of('\u{00A0}');
        assert_eq!(info.name, "no-break space");
        assert_eq!(info.category, "Zs");
        assert!(info.is_whitespace);
        assert!(!info.is_printable);
        assert!(info.reportable);
    }

    #[test]
    fn en_dash_is_visible_yet_reportable() {
        let info = CharInfo::of('\u{2013}');
        assert_eq!(info.name, "en dash");
        assert_eq!(info.category, "Pd");
        assert!(info.is_printable);
        assert!(info.reportable);
    }

    #[test]
    fn tab_is_curated_control_whitespace() {
        let info = CharInfo::of('\t');
        assert_eq!(info.name, "tab");
        assert_eq!(info.category, "Cc");
        assert!(info.is_control);
        assert!(info.is_whitespace);
        assert!(info.reportable);
    }

    #[test]
    fn unnamed_control_falls_back_to_unknown() {
        let info = CharInfo::of('\u{0001}');
        assert_eq!(info.name, "UNKNOWN");
        assert!(info.is_control);
        assert!(!info.is_printable);
        assert!(info.reportable);
    }

    #[test]
    fn private_use_is_unknown() {
        let info = CharInfo::of('\u{E000}');
        assert_eq!(info.name, "UNKNOWN");
        assert_eq!(info.category, "Co");
        assert!(info.reportable);
    }

    #[test]
    fn zero_width_space_is_reportable() {
        let info = CharInfo::of('\u{200B}');
        assert_eq!(info.name, "zero width space");
        assert!(info.reportable);
    }

    #[test]
    fn curated_lookup() {
        assert!(is_curated('\u{2014}'));
        assert!(is_curated('\n'));
        assert!(!is_curated(' '));
        assert!(!is_curated('-'));
    }
}
