//! # autover
//!
//! Format-driven automatic version bumping for git repositories.
//!
//! autover keeps a project's version in a `version.json` file and advances
//! it on every commit. Instead of conforming to a fixed scheme, the layout
//! of the version string is described by a user-defined format string, and
//! the patch counter resets whenever a tracked calendar unit rolls over.
//!
//! ## Examples
//!
//! Derive a next version directly:
//!
//! ```
//! use autover::prelude::*;
//!
//! let format = Format::compile("YY.MM.N").unwrap();
//! let current = format.parse_version("25.1.4").unwrap();
//!
//! // same year and month: the patch counter keeps counting
//! let date = Date::explicit(2025, 1, 15).unwrap();
//! let next = current.next(&date, 1, 0).unwrap();
//! assert_eq!("25.1.5", next.to_string());
//!
//! // the month rolled over: the counter restarts at 1
//! let date = Date::explicit(2025, 2, 1).unwrap();
//! let next = current.next(&date, 1, 0).unwrap();
//! assert_eq!("25.2.1", next.to_string());
//! ```
//!
//! Or run the whole pipeline against the persisted stores, the way the
//! pre-commit hook does:
//!
//! ```no_run
//! use autover::prelude::*;
//!
//! let mut versions = JsonVersionStore::new("version.json");
//! let config = JsonConfigStore::new("version-config.json");
//! let outcome = autover::bump(&mut versions, &config, &Date::local_now()).unwrap();
//! println!("Version bumped: {} -> {}", outcome.previous, outcome.next);
//! ```
//!
//! ## Important Terms
//!
//! - **Format**: a string describing the structure of a version string,
//!   made of *tokens* and *literal text*. Modeled by [`Format`].
//! - **Token**: a placeholder standing for one semantic field. Unlike many
//!   template languages there is no bracketing; tokens are recognized by
//!   their spelling alone, longest spelling first.
//! - **Version**: a version string parsed against a format, holding the
//!   value of each token positionally. Modeled by [`Version`].
//! - **Reset**: the decision to restart the patch counter at `1` because a
//!   tracked date unit (year, month, or day) advanced since the version
//!   was last written.
//!
//! ## Tokens
//!
//! | Token | Example | Description |
//! |---|---|---|
//! | `YYYY` | `2025` | Full 4-digit year |
//! | `YY` | `25` | Last two digits of the year, as spelled (`09` for 2009) |
//! | `MM` | `01` | Month, zero-padded to 2 digits |
//! | `M` | `1` | Month, unpadded |
//! | `DD` | `05` | Day of the month, zero-padded to 2 digits |
//! | `D` | `5` | Day of the month, unpadded |
//! | `N` | `42` | The patch counter |
//! | `MAJORVERSION` | `2` | Pass-through major number from the record |
//! | `MINORVERSION` | `5` | Pass-through minor number from the record |
//!
//! A format may use either `YYYY` or `YY`, not both. Any other text in a
//! format is literal and must appear verbatim in version strings.
//!
//! ## Stores
//!
//! The pipeline reads and writes through two narrow store traits,
//! [`VersionStore`] and [`ConfigStore`], so the derivation itself never
//! touches the filesystem. The shipped implementations keep JSON files in
//! the repository root: `version.json` (the record, with any extra fields
//! collaborators put there preserved across bumps) and
//! `version-config.json` (optional; its `format` field overrides the
//! default `YY.MM.N`).
#![warn(missing_docs)]

mod error;
mod format;
mod hook;
mod pipeline;
mod store;
mod token;
mod version;

pub use crate::error::{
    BumpError, DateError, FormatError, SetupError, StoreError, VersionError,
};
pub use crate::format::Format;
pub use crate::hook::{setup, SetupReport};
pub use crate::pipeline::{bump, Bump, DEFAULT_FORMAT};
pub use crate::store::{
    ConfigStore, JsonConfigStore, JsonVersionStore, VersionConfig, VersionRecord, VersionStore,
};
pub use crate::token::{Field, Token};
pub use crate::version::{Date, DateParts, Version, VersionParts};

/// A convenience module appropriate for glob imports (`use autover::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::Bump;
    #[doc(no_inline)]
    pub use crate::BumpError;
    #[doc(no_inline)]
    pub use crate::ConfigStore;
    #[doc(no_inline)]
    pub use crate::Date;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::Format;
    #[doc(no_inline)]
    pub use crate::FormatError;
    #[doc(no_inline)]
    pub use crate::JsonConfigStore;
    #[doc(no_inline)]
    pub use crate::JsonVersionStore;
    #[doc(no_inline)]
    pub use crate::StoreError;
    #[doc(no_inline)]
    pub use crate::Version;
    #[doc(no_inline)]
    pub use crate::VersionError;
    #[doc(no_inline)]
    pub use crate::VersionRecord;
    #[doc(no_inline)]
    pub use crate::VersionStore;
}
