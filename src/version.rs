use crate::{
    error::{DateError, VersionError},
    format::{Format, Segment},
    token::{Field, Token},
};
use chrono::{Datelike, Local, NaiveDate, Utc};
use std::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};

/// A reference date for deriving calendar field values.
///
/// The date is always supplied by the caller (current UTC date, current
/// local date, an explicit date, or a parsed string), never read ambiently
/// inside the derivation, so the pipeline stays deterministic and testable.
///
/// ```
/// use autover::Date;
///
/// let explicit = Date::explicit(2025, 1, 15).unwrap();
/// let parsed: Date = "2025-01-15".parse().unwrap();
/// assert_eq!(explicit, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Date(NaiveDate);

impl Date {
    /// Returns the current date in UTC at the time of this call.
    pub fn utc_now() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns the current date in the system's local timezone at the time
    /// of this call.
    pub fn local_now() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the given date, or [`DateError::InvalidDateArguments`] if the
    /// arguments do not form a real date.
    pub fn explicit(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDateArguments { year, month, day })
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a `YYYY-MM-DD` date string. See [`NaiveDate::from_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::from_str(s)?))
    }
}

impl Deref for Date {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar field values derived from a [`Date`], in every form a token can
/// ask for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    /// Full year, e.g. `2025`.
    pub year: u64,

    /// The last two digits of the year as written, e.g. `"25"`, or `"09"`
    /// for 2009. A truncation of the year's decimal spelling, not a modulo,
    /// so the zero-padding of years like 2009 survives.
    pub year_short: String,

    /// Month of the year, 1–12.
    pub month: u64,

    /// Day of the month, 1–31.
    pub day: u64,
}

impl DateParts {
    /// Derives the calendar field values for `date`.
    ///
    /// # Errors
    ///
    /// - [`VersionError::NegativeYear`] for dates before year 0: their
    ///   formatted year would not survive a round trip through the
    ///   matching pattern.
    pub fn for_date(date: &Date) -> Result<Self, VersionError> {
        let year = date.year();
        if year < 0 {
            return Err(VersionError::NegativeYear { year });
        }

        let spelled = year.to_string();
        let year_short = if spelled.len() > 2 {
            spelled[spelled.len() - 2..].to_owned()
        } else {
            spelled
        };

        Ok(Self {
            year: year as u64,
            year_short,
            month: u64::from(date.month()),
            day: u64::from(date.day()),
        })
    }
}

/// Field values for rendering a version string with [`Format::render`], or
/// extracted from one by [`Version::parts`].
///
/// Only fields whose token appears in the format participate; the rest stay
/// `None`. Extraction never synthesizes an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionParts {
    /// 4-digit year (`YYYY`).
    pub year_full: Option<u64>,

    /// Last-two-digits year as written (`YY`), kept as a string so the
    /// presence or absence of a leading zero is preserved.
    pub year_short: Option<String>,

    /// Month of the year (`MM`, `M`).
    pub month: Option<u64>,

    /// Day of the month (`DD`, `D`).
    pub day: Option<u64>,

    /// Patch counter (`N`).
    pub patch: Option<u64>,

    /// Major number (`MAJORVERSION`).
    pub major: Option<u64>,

    /// Minor number (`MINORVERSION`).
    pub minor: Option<u64>,
}

impl VersionParts {
    /// Seeds parts for a fresh version: today's calendar values and a patch
    /// counter starting at `1`.
    pub fn initial(today: &DateParts, major: u64, minor: u64) -> Self {
        Self {
            year_full: Some(today.year),
            year_short: Some(today.year_short.clone()),
            month: Some(today.month),
            day: Some(today.day),
            patch: Some(1),
            major: Some(major),
            minor: Some(minor),
        }
    }
}

/// One matched piece of a version string: a token's captured text, or the
/// literal run between tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
enum VersionToken {
    Value {
        /// The captured text, exactly as it appeared. Kept raw so rendering
        /// can preserve the zero-padding the stored version already uses.
        raw: String,
        token: &'static Token,
    },
    Literal(String),
}

/// A version string parsed against a [`Format`].
///
/// Holds each token's captured text positionally, in template order.
/// Created by [`Format::parse_version`]; turned back into a string through
/// its `Display` impl; advanced with [`Version::next`].
///
/// # Example
///
/// ```
/// use autover::{Date, Format};
///
/// let format = Format::compile("YY.MM.N").unwrap();
/// let current = format.parse_version("25.1.4").unwrap();
///
/// // same month: the patch counter increments
/// let date = Date::explicit(2025, 1, 15).unwrap();
/// assert_eq!("25.1.5", current.next(&date, 1, 0).unwrap().to_string());
///
/// // new month: the patch counter resets
/// let date = Date::explicit(2025, 2, 1).unwrap();
/// assert_eq!("25.2.1", current.next(&date, 1, 0).unwrap().to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    tokens: Vec<VersionToken>,
}

impl Version {
    /// Parses a version string against a format.
    ///
    /// The anchored pattern must match the whole string; each capture group
    /// is assigned, left to right, to the token at the same position in the
    /// template.
    ///
    /// # Errors
    ///
    /// - [`VersionError::FormatMismatch`] when the string does not match.
    pub(crate) fn parse(version_str: &str, format: &Format) -> Result<Self, VersionError> {
        let captures =
            format
                .pattern
                .captures(version_str)
                .ok_or_else(|| VersionError::FormatMismatch {
                    version_string: version_str.to_owned(),
                    format_string: format.format_string().to_owned(),
                })?;

        let mut tokens = Vec::with_capacity(format.segments.len());
        let mut group = 0;

        for segment in &format.segments {
            match segment {
                Segment::Literal(text) => tokens.push(VersionToken::Literal(text.clone())),
                Segment::Token(token) => {
                    group += 1;
                    tokens.push(VersionToken::Value {
                        raw: captures[group].to_owned(),
                        token,
                    });
                }
            }
        }

        Ok(Self { tokens })
    }

    /// The field values this version carries. For repeated tokens the
    /// rightmost occurrence wins.
    pub fn parts(&self) -> VersionParts {
        let mut parts = VersionParts::default();

        for token in &self.tokens {
            if let VersionToken::Value { raw, token } = token {
                match token.field {
                    Field::YearFull => parts.year_full = raw.parse().ok(),
                    Field::YearShort => parts.year_short = Some(raw.clone()),
                    Field::Month => parts.month = raw.parse().ok(),
                    Field::Day => parts.day = raw.parse().ok(),
                    Field::Patch => parts.patch = raw.parse().ok(),
                    Field::Major => parts.major = raw.parse().ok(),
                    Field::Minor => parts.minor = raw.parse().ok(),
                }
            }
        }

        parts
    }

    /// Decides whether the patch counter must restart because a tracked
    /// date unit advanced.
    ///
    /// True iff a year token is present and its parsed value differs from
    /// today's (4-digit compared to 4-digit, 2-digit spelling compared to
    /// 2-digit spelling), or likewise for a month or day token. Units
    /// without a token in the template contribute nothing, in particular
    /// they never count as a mismatch.
    pub fn should_reset(&self, today: &DateParts) -> bool {
        let parts = self.parts();

        let year_changed = parts
            .year_full
            .map(|year| year != today.year)
            .or_else(|| {
                parts
                    .year_short
                    .as_ref()
                    .map(|spelled| *spelled != today.year_short)
            })
            .unwrap_or(false);
        let month_changed = parts.month.map(|month| month != today.month).unwrap_or(false);
        let day_changed = parts.day.map(|day| day != today.day).unwrap_or(false);

        year_changed || month_changed || day_changed
    }

    /// Returns the next version: date-bearing fields move to `date`'s
    /// values, the patch counter resets to `1` when a tracked date unit
    /// changed and increments otherwise, and major/minor pass through
    /// unchanged from the caller.
    ///
    /// Month and day keep the zero-padding width the stored version already
    /// used, so `25.1.4` stays in the `25.1.x` spelling while `2025.01.15.9`
    /// stays in `2025.01.x`.
    ///
    /// # Errors
    ///
    /// - [`VersionError::NegativeYear`] if `date` lies before year 0.
    pub fn next(&self, date: &Date, major: u64, minor: u64) -> Result<Self, VersionError> {
        let today = DateParts::for_date(date)?;
        let reset = self.should_reset(&today);
        let patch = if reset {
            1
        } else {
            self.parts().patch.unwrap_or(0) + 1
        };

        let tokens = self
            .tokens
            .iter()
            .map(|version_token| match version_token {
                VersionToken::Literal(_) => version_token.clone(),
                VersionToken::Value { raw, token } => {
                    let new_raw = match token.field {
                        Field::YearFull => today.year.to_string(),
                        Field::YearShort => today.year_short.clone(),
                        Field::Month => pad_like(raw, today.month),
                        Field::Day => pad_like(raw, today.day),
                        Field::Patch => patch.to_string(),
                        Field::Major => major.to_string(),
                        Field::Minor => minor.to_string(),
                    };
                    VersionToken::Value {
                        raw: new_raw,
                        token,
                    }
                }
            })
            .collect();

        Ok(Self { tokens })
    }
}

/// Spells `value` with at least as many digits as `previous` had, so an
/// established `01`-style spelling is kept and an established `1`-style
/// spelling is not widened.
fn pad_like(previous: &str, value: u64) -> String {
    format!("{value:0width$}", width = previous.len())
}

impl Display for Version {
    /// Renders the version string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                VersionToken::Value { raw, .. } => f.write_str(raw)?,
                VersionToken::Literal(text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}
