use crate::{
    error::{FormatError, VersionError},
    token::{self, Field, Token},
    version::{Version, VersionParts},
};
use regex::Regex;
use std::fmt::{self, Display};

/// One segment of a compiled format: a recognized token or a run of literal
/// text. Literal runs keep their original spelling for rendering; the
/// matching pattern holds their escaped form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Token(&'static Token),
    Literal(String),
}

/// A compiled format string.
///
/// A format describes the structure of a version string with token
/// placeholders (`YYYY`, `YY`, `MM`, `M`, `DD`, `D`, `N`, `MAJORVERSION`,
/// `MINORVERSION`) and literal text. Compiling produces the anchored
/// matching pattern used to extract field values from an existing version
/// string, and the token order used to put values back.
///
/// Compilation is a pure function of the format string: compiling the same
/// string twice yields formats that behave identically.
///
/// # Example
///
/// ```
/// use autover::Format;
///
/// let format = Format::compile("YY.MM.N").unwrap();
/// assert_eq!("YY.MM.N", format.to_string());
/// ```
#[derive(Debug, Clone)]
pub struct Format {
    format_string: String,
    pub(crate) segments: Vec<Segment>,
    pub(crate) pattern: Regex,
}

impl Format {
    /// Compiles a format string.
    ///
    /// Token spellings are recognized in one pass of the single alternation
    /// scanner, longest spelling first, so `YYYY` is never read as two
    /// `YY`s and `MAJORVERSION` is never broken into `M`-and-letters.
    /// Everything between token hits is literal text, escaped verbatim into
    /// the matching pattern.
    ///
    /// # Errors
    ///
    /// - [`FormatError::Empty`] if `format_str` is empty.
    /// - [`FormatError::ConflictingYearTokens`] if `format_str` contains
    ///   both `YYYY` and `YY`. Only one year form can be tracked.
    pub fn compile(format_str: &str) -> Result<Self, FormatError> {
        if format_str.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut segments = Vec::new();
        let mut pattern = String::from("^");
        let mut last_end = 0;

        for hit in token::SCANNER.find_iter(format_str) {
            if hit.start() > last_end {
                let literal = &format_str[last_end..hit.start()];
                pattern.push_str(&regex::escape(literal));
                segments.push(Segment::Literal(literal.to_owned()));
            }

            let matched = Token::for_literal(hit.as_str())
                .expect("scanner emits only spellings from the token table");
            pattern.push_str(matched.group);
            segments.push(Segment::Token(matched));

            last_end = hit.end();
        }

        if last_end < format_str.len() {
            let literal = &format_str[last_end..];
            pattern.push_str(&regex::escape(literal));
            segments.push(Segment::Literal(literal.to_owned()));
        }

        pattern.push('$');

        let has_full_year = segments
            .iter()
            .any(|segment| matches!(segment, Segment::Token(t) if t.field == Field::YearFull));
        let has_short_year = segments
            .iter()
            .any(|segment| matches!(segment, Segment::Token(t) if t.field == Field::YearShort));
        if has_full_year && has_short_year {
            return Err(FormatError::ConflictingYearTokens {
                format_string: format_str.to_owned(),
            });
        }

        let pattern = Regex::new(&pattern)
            .expect("escaped literals and fixed groups always form a valid pattern");

        Ok(Self {
            format_string: format_str.to_owned(),
            segments,
            pattern,
        })
    }

    /// Parses a version string against this format and returns a [`Version`]
    /// holding the extracted field values.
    ///
    /// # Errors
    ///
    /// - [`VersionError::FormatMismatch`] if the version string does not
    ///   match, carrying both the version and the format string. Nothing is
    ///   recoverable about a mismatch: the caller must stop before
    ///   persisting anything.
    pub fn parse_version(&self, version_str: &str) -> Result<Version, VersionError> {
        Version::parse(version_str, self)
    }

    /// Renders field values into a version string, substituting each token
    /// in template order and leaving literal text untouched.
    ///
    /// Month and day render zero-padded exactly when the token is the
    /// padded spelling (`MM`, `DD`); patch, major, and minor render as
    /// plain integers.
    ///
    /// # Errors
    ///
    /// - [`VersionError::MissingValue`] if the format contains a token for
    ///   a field `parts` does not carry.
    pub fn render(&self, parts: &VersionParts) -> Result<String, VersionError> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(token) => {
                    let missing = || VersionError::MissingValue {
                        literal: token.literal,
                    };
                    match token.field {
                        Field::YearShort => {
                            out.push_str(parts.year_short.as_deref().ok_or_else(missing)?);
                        }
                        Field::YearFull => {
                            out.push_str(&token.format_value(parts.year_full.ok_or_else(missing)?));
                        }
                        Field::Month => {
                            out.push_str(&token.format_value(parts.month.ok_or_else(missing)?));
                        }
                        Field::Day => {
                            out.push_str(&token.format_value(parts.day.ok_or_else(missing)?));
                        }
                        Field::Patch => {
                            out.push_str(&token.format_value(parts.patch.ok_or_else(missing)?));
                        }
                        Field::Major => {
                            out.push_str(&token.format_value(parts.major.ok_or_else(missing)?));
                        }
                        Field::Minor => {
                            out.push_str(&token.format_value(parts.minor.ok_or_else(missing)?));
                        }
                    }
                }
            }
        }

        Ok(out)
    }

    /// Returns true if any token in this format stands for `field`.
    ///
    /// ```
    /// use autover::{Field, Format};
    ///
    /// let format = Format::compile("YY.MM.N").unwrap();
    /// assert!(format.has(Field::Month));
    /// assert!(!format.has(Field::Day));
    /// ```
    pub fn has(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Token(t) if t.field == field))
    }

    /// The format string this was compiled from.
    pub fn format_string(&self) -> &str {
        &self.format_string
    }
}

impl PartialEq for Format {
    // Regex carries no useful equality; two formats are equal when their
    // segmentation is.
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Format {}

impl Display for Format {
    /// Displays a format as its format string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{
        FULL_YEAR, MAJOR, MINOR, PADDED_DAY, PADDED_MONTH, PATCH, SHORT_DAY, SHORT_MONTH,
        SHORT_YEAR,
    };

    #[test]
    fn test_compile_default_format() {
        let format = Format::compile("YY.MM.N").unwrap();
        assert_eq!(r"^(\d{1,2})\.(\d{1,2})\.(\d+)$", format.pattern.as_str());
        assert_eq!(
            vec![
                Segment::Token(&SHORT_YEAR),
                Segment::Literal(".".to_owned()),
                Segment::Token(&PADDED_MONTH),
                Segment::Literal(".".to_owned()),
                Segment::Token(&PATCH),
            ],
            format.segments
        );
    }

    #[test]
    fn test_compile_full_date_format() {
        let format = Format::compile("YYYY.MM.DD.N").unwrap();
        assert_eq!(
            r"^(\d{4})\.(\d{1,2})\.(\d{1,2})\.(\d+)$",
            format.pattern.as_str()
        );
    }

    #[test]
    fn test_compile_semantic_format() {
        let format = Format::compile("MAJORVERSION.MINORVERSION.N").unwrap();
        assert_eq!(r"^(\d+)\.(\d+)\.(\d+)$", format.pattern.as_str());
        assert_eq!(
            vec![
                Segment::Token(&MAJOR),
                Segment::Literal(".".to_owned()),
                Segment::Token(&MINOR),
                Segment::Literal(".".to_owned()),
                Segment::Token(&PATCH),
            ],
            format.segments
        );
    }

    #[test]
    fn test_compile_unpadded_tokens() {
        let format = Format::compile("YYYY-M-D-N").unwrap();
        assert_eq!(
            vec![
                Segment::Token(&FULL_YEAR),
                Segment::Literal("-".to_owned()),
                Segment::Token(&SHORT_MONTH),
                Segment::Literal("-".to_owned()),
                Segment::Token(&SHORT_DAY),
                Segment::Literal("-".to_owned()),
                Segment::Token(&PATCH),
            ],
            format.segments
        );
    }

    #[test]
    fn test_literals_are_escaped() {
        let format = Format::compile("vYY+MM(N)").unwrap();
        assert_eq!(
            r"^v(\d{1,2})\+(\d{1,2})\((\d+)\)$",
            format.pattern.as_str()
        );
        assert!(format.pattern.is_match("v25+1(4)"));
        assert!(!format.pattern.is_match("v25x1(4)"));
    }

    #[test]
    fn test_patch_only_format() {
        let format = Format::compile("N").unwrap();
        assert_eq!(r"^(\d+)$", format.pattern.as_str());
        assert_eq!(vec![Segment::Token(&PATCH)], format.segments);
    }

    #[test]
    fn test_all_literal_format() {
        // no tokens at all: the pattern can only ever match the literal
        let format = Format::compile("release").unwrap();
        assert!(format.pattern.is_match("release"));
        assert!(!format.pattern.is_match("release1"));
    }

    #[test]
    fn test_empty_format_rejected() {
        assert_eq!(Err(FormatError::Empty), Format::compile(""));
    }

    #[test]
    fn test_conflicting_year_tokens_rejected() {
        let args = ["YYYY.YY.N", "YY-YYYY", "YYYYYY"];
        for format_str in args {
            assert_eq!(
                Err(FormatError::ConflictingYearTokens {
                    format_string: format_str.to_owned(),
                }),
                Format::compile(format_str)
            );
        }
    }

    #[test]
    fn test_year_repeated_same_form_allowed() {
        // only the mixed pair is ambiguous
        assert!(Format::compile("YYYY.YYYY").is_ok());
        assert!(Format::compile("YY.YY").is_ok());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let first = Format::compile("YYYY.MM.DD.N").unwrap();
        let second = Format::compile("YYYY.MM.DD.N").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.pattern.as_str(), second.pattern.as_str());
    }

    #[test]
    fn test_neq_across_spellings() {
        let padded = Format::compile("YYYY.MM").unwrap();
        let short = Format::compile("YYYY.M").unwrap();
        assert_ne!(padded, short);
    }

    #[test]
    fn test_display_round_trips_format_string() {
        let args = ["YY.MM.N", "YYYY.MM.DD.N", "vMAJORVERSION.MINORVERSION.N", "N"];
        for format_str in args {
            let format = Format::compile(format_str).unwrap();
            assert_eq!(format_str, format.to_string());
        }
    }

    #[test]
    fn test_has() {
        let format = Format::compile("YY.MM.N").unwrap();
        assert!(format.has(Field::YearShort));
        assert!(format.has(Field::Month));
        assert!(format.has(Field::Patch));
        assert!(!format.has(Field::YearFull));
        assert!(!format.has(Field::Day));
        assert!(!format.has(Field::Major));
    }

    #[test]
    fn test_year_conflict_check_runs_before_pattern_use() {
        // the degenerate YYYYYY scan (YYYY then YY) must error, not compile
        // into a format that quietly tracks both year forms
        assert!(matches!(
            Format::compile("YYYYYY.N"),
            Err(FormatError::ConflictingYearTokens { .. })
        ));
    }
}
