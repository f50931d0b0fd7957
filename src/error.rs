use std::path::PathBuf;

/// Errors from compiling a format string. See [`Format`](crate::Format).
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The format string was empty.
    #[error("Format string should not be empty")]
    Empty,

    /// The format string contained both a `YYYY` and a `YY` token. The two
    /// year forms cannot be tracked at once.
    #[error("Format `{format_string}` should not contain both `YYYY` and `YY`")]
    ConflictingYearTokens {
        /// The offending format string.
        format_string: String,
    },
}

/// Errors from parsing, deriving, or rendering versions.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    /// The stored version string did not match the compiled format. This is
    /// the one fatal condition of a bump run: nothing is written when it
    /// occurs.
    #[error("Version `{version_string}` should match format `{format_string}`")]
    FormatMismatch {
        /// The version string that failed to match.
        version_string: String,
        /// The format string it was matched against.
        format_string: String,
    },

    /// The reference date's year should not be negative when formatted.
    #[error("Year `{year}` should not be negative when formatted")]
    NegativeYear {
        /// The offending year.
        year: i32,
    },

    /// Rendering was asked for a token whose value was never resolved.
    #[error("No value for `{literal}` to render")]
    MissingValue {
        /// The literal spelling of the token without a value.
        literal: &'static str,
    },
}

/// Errors from constructing a [`Date`](crate::Date).
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DateError {
    /// The explicit year/month/day arguments did not form a real date.
    #[error("Explicit year ({year}), month ({month}), and day ({day}) arguments should make a valid date")]
    InvalidDateArguments {
        /// Year argument.
        year: i32,
        /// Month argument.
        month: u32,
        /// Day argument.
        day: u32,
    },

    /// The date string could not be parsed.
    #[error(transparent)]
    UnparseableDate(#[from] chrono::ParseError),
}

/// Errors from reading or writing a persisted store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("Could not access `{}`: {source}", .path.display())]
    Io {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store file did not hold the expected JSON shape.
    #[error("`{}` should hold a JSON version record: {source}", .path.display())]
    Malformed {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying decode error.
        source: serde_json::Error,
    },
}

/// Errors from preparing a repository. See [`setup`](crate::setup).
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    /// The target directory is not a git repository.
    #[error("Not a git repository (no `.git` in `{}`). Run `git init` first", .path.display())]
    NotARepository {
        /// The directory that was checked.
        path: PathBuf,
    },

    /// A file write failed mid-setup.
    #[error("Could not write `{}`: {source}", .path.display())]
    Io {
        /// Path of the file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Rendering the seed version failed before any file was written.
    #[error(transparent)]
    Seed(#[from] BumpError),
}

/// Any error a bump run can surface. Composes the per-stage errors so the
/// pipeline and the CLI can carry one type.
#[derive(thiserror::Error, Debug)]
pub enum BumpError {
    /// The configured format string did not compile.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Parsing or rendering failed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// A store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}
