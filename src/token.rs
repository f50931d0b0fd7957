use once_cell::sync::Lazy;
use regex::Regex;

/// The semantic field a token stands for.
///
/// The `MM`/`M` and `DD`/`D` pairs share a field: they differ only in how
/// the value is rendered, not in what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 4-digit year (`YYYY`).
    YearFull,
    /// Last two digits of the year (`YY`).
    YearShort,
    /// Month of the year, 1–12 (`MM`, `M`).
    Month,
    /// Day of the month, 1–31 (`DD`, `D`).
    Day,
    /// The patch counter (`N`).
    Patch,
    /// The pass-through major number (`MAJORVERSION`).
    Major,
    /// The pass-through minor number (`MINORVERSION`).
    Minor,
}

/// A recognized placeholder in a format string.
#[derive(Debug, PartialEq, Eq)]
pub struct Token {
    /// The literal spelling that identifies this token in a format string.
    pub(crate) literal: &'static str,

    /// The capturing group substituted for this token in the matching
    /// pattern, including its parentheses.
    pub(crate) group: &'static str,

    pub(crate) field: Field,

    /// Whether a value for this token renders zero-padded to two digits.
    pub(crate) padded: bool,
}

/// Full year - 2006, 2016, 2106
pub(crate) static FULL_YEAR: Token = Token {
    literal: "YYYY",
    group: r"(\d{4})",
    field: Field::YearFull,
    padded: false,
};

/// Short year - "6", "16", and "09" for 2009 (a truncation, not a modulo)
pub(crate) static SHORT_YEAR: Token = Token {
    literal: "YY",
    group: r"(\d{1,2})",
    field: Field::YearShort,
    padded: false,
};

/// Zero-padded month - 01, 02 ... 11, 12
pub(crate) static PADDED_MONTH: Token = Token {
    literal: "MM",
    group: r"(\d{1,2})",
    field: Field::Month,
    padded: true,
};

/// Short month - 1, 2 ... 11, 12
pub(crate) static SHORT_MONTH: Token = Token {
    literal: "M",
    group: r"(\d{1,2})",
    field: Field::Month,
    padded: false,
};

/// Zero-padded day - 01, 02 ... 30, 31
pub(crate) static PADDED_DAY: Token = Token {
    literal: "DD",
    group: r"(\d{1,2})",
    field: Field::Day,
    padded: true,
};

/// Short day - 1, 2 ... 30, 31
pub(crate) static SHORT_DAY: Token = Token {
    literal: "D",
    group: r"(\d{1,2})",
    field: Field::Day,
    padded: false,
};

/// Patch counter - any non-negative integer
pub(crate) static PATCH: Token = Token {
    literal: "N",
    group: r"(\d+)",
    field: Field::Patch,
    padded: false,
};

pub(crate) static MAJOR: Token = Token {
    literal: "MAJORVERSION",
    group: r"(\d+)",
    field: Field::Major,
    padded: false,
};

pub(crate) static MINOR: Token = Token {
    literal: "MINORVERSION",
    group: r"(\d+)",
    field: Field::Minor,
    padded: false,
};

/// Every token, longest spelling first. The scanner alternation is built from
/// this order, so `YYYY` can never be taken for two `YY`s and the word tokens
/// win over the bare letters they contain.
pub(crate) static ALL: &[&Token] = &[
    &MAJOR,
    &MINOR,
    &FULL_YEAR,
    &SHORT_YEAR,
    &PADDED_MONTH,
    &PADDED_DAY,
    &PATCH,
    &SHORT_MONTH,
    &SHORT_DAY,
];

/// The single alternation regex that identifies tokens in a format string.
/// One pass with this is the only way token boundaries are decided;
/// per-token substring checks would let `YY` match inside `YYYY`.
pub(crate) static SCANNER: Lazy<Regex> = Lazy::new(|| {
    let alternation = ALL
        .iter()
        .map(|token| token.literal)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("token alternation is a valid pattern")
});

impl Token {
    /// Maps a scanner hit back to its token.
    pub(crate) fn for_literal(literal: &str) -> Option<&'static Token> {
        ALL.iter().find(|token| token.literal == literal).copied()
    }

    /// Formats a numeric value the way this token spells it.
    ///
    /// Not used for `YY`: the short year is carried as the truncated string
    /// itself, see [`DateParts`](crate::DateParts).
    pub(crate) fn format_value(&self, value: u64) -> String {
        if self.padded {
            format!("{value:02}")
        } else {
            value.to_string()
        }
    }
}
