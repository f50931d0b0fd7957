use crate::{
    error::BumpError,
    format::Format,
    store::{ConfigStore, VersionStore},
    version::Date,
};

/// The format used when no configuration provides one.
pub const DEFAULT_FORMAT: &str = "YY.MM.N";

/// The outcome of one bump run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bump {
    /// The version string that was stored when the run began.
    pub previous: String,

    /// The version string that was derived and persisted.
    pub next: String,
}

/// Runs the derivation once against the given stores: read the record,
/// compile the configured (or default) format, parse the stored version,
/// derive the next one for `date`, and write the merged record back.
///
/// The record is read once at the start and written once at the end;
/// nothing is written on any failure. Callers are expected to serialize
/// invocations against one repository (the pre-commit hook runs one at a
/// time); two racing runs could lose an update.
///
/// # Errors
///
/// - [`VersionError::FormatMismatch`](crate::VersionError::FormatMismatch)
///   if the stored version does not match the format. The run must stop
///   here: deriving from an unparseable version would corrupt the history.
/// - [`FormatError`](crate::FormatError) if the configured format does not
///   compile.
/// - [`StoreError`](crate::StoreError) if a store cannot be read or the
///   record cannot be written.
pub fn bump(
    versions: &mut impl VersionStore,
    config: &impl ConfigStore,
    date: &Date,
) -> Result<Bump, BumpError> {
    let mut record = versions.get()?;

    let format_string = config
        .get()?
        .and_then(|config| config.format)
        .unwrap_or_else(|| DEFAULT_FORMAT.to_owned());
    let format = Format::compile(&format_string)?;
    tracing::debug!("deriving `{}` against `{format_string}`", record.version);

    let current = format.parse_version(&record.version)?;

    let major = record.major_version.unwrap_or(1);
    let minor = record.minor_version.unwrap_or(0);

    let next = current.next(date, major, minor)?;
    let next_string = next.to_string();

    let previous = std::mem::replace(&mut record.version, next_string.clone());
    record.major_version = Some(major);
    record.minor_version = Some(minor);
    versions.put(&record)?;

    tracing::info!("version bumped: {previous} -> {next_string}");

    Ok(Bump {
        previous,
        next: next_string,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{StoreError, VersionError},
        store::{VersionConfig, VersionRecord},
    };
    use serde_json::json;

    /// A store over a plain record, counting writes.
    struct MemVersionStore {
        record: VersionRecord,
        puts: usize,
    }

    impl MemVersionStore {
        fn new(record: VersionRecord) -> Self {
            Self { record, puts: 0 }
        }
    }

    impl VersionStore for MemVersionStore {
        fn get(&self) -> Result<VersionRecord, StoreError> {
            Ok(self.record.clone())
        }

        fn put(&mut self, record: &VersionRecord) -> Result<(), StoreError> {
            self.record = record.clone();
            self.puts += 1;
            Ok(())
        }
    }

    struct MemConfigStore(Option<VersionConfig>);

    impl ConfigStore for MemConfigStore {
        fn get(&self) -> Result<Option<VersionConfig>, StoreError> {
            Ok(self.0.clone())
        }
    }

    fn config_with(format: &str) -> MemConfigStore {
        MemConfigStore(Some(VersionConfig {
            format: Some(format.to_owned()),
        }))
    }

    fn date(year: i32, month: u32, day: u32) -> Date {
        Date::explicit(year, month, day).unwrap()
    }

    #[test]
    fn test_bump_with_default_format() {
        let mut versions = MemVersionStore::new(VersionRecord::new("25.1.4"));

        let outcome = bump(&mut versions, &MemConfigStore(None), &date(2025, 1, 15)).unwrap();

        assert_eq!("25.1.4", outcome.previous);
        assert_eq!("25.1.5", outcome.next);
        assert_eq!("25.1.5", versions.record.version);
        assert_eq!(1, versions.puts);
    }

    #[test]
    fn test_bump_resets_on_new_month() {
        let mut versions = MemVersionStore::new(VersionRecord::new("25.1.4"));

        let outcome = bump(&mut versions, &MemConfigStore(None), &date(2025, 2, 1)).unwrap();

        assert_eq!("25.2.1", outcome.next);
    }

    #[test]
    fn test_bump_with_configured_format() {
        let mut versions = MemVersionStore::new(VersionRecord::new("2025.01.15.9"));

        let outcome = bump(
            &mut versions,
            &config_with("YYYY.MM.DD.N"),
            &date(2025, 1, 16),
        )
        .unwrap();

        assert_eq!("2025.01.16.1", outcome.next);
    }

    #[test]
    fn test_bump_patch_only_format_never_resets() {
        let mut versions = MemVersionStore::new(VersionRecord::new("7"));

        let outcome = bump(&mut versions, &config_with("N"), &date(2031, 12, 31)).unwrap();

        assert_eq!("8", outcome.next);
    }

    #[test]
    fn test_bump_passes_major_minor_through() {
        let mut record = VersionRecord::new("2.5.3");
        record.major_version = Some(2);
        record.minor_version = Some(5);
        let mut versions = MemVersionStore::new(record);

        let outcome = bump(
            &mut versions,
            &config_with("MAJORVERSION.MINORVERSION.N"),
            &date(2031, 12, 31),
        )
        .unwrap();

        assert_eq!("2.5.4", outcome.next);
        assert_eq!(Some(2), versions.record.major_version);
        assert_eq!(Some(5), versions.record.minor_version);
    }

    #[test]
    fn test_bump_defaults_major_minor_and_writes_them_back() {
        let mut versions = MemVersionStore::new(VersionRecord::new("25.1.4"));

        bump(&mut versions, &MemConfigStore(None), &date(2025, 1, 15)).unwrap();

        assert_eq!(Some(1), versions.record.major_version);
        assert_eq!(Some(0), versions.record.minor_version);
    }

    #[test]
    fn test_bump_preserves_unknown_record_fields() {
        let mut record = VersionRecord::new("25.1.4");
        record
            .extra
            .insert("releaseChannel".to_owned(), json!("beta"));
        let mut versions = MemVersionStore::new(record);

        bump(&mut versions, &MemConfigStore(None), &date(2025, 1, 15)).unwrap();

        assert_eq!(
            Some(&json!("beta")),
            versions.record.extra.get("releaseChannel")
        );
    }

    #[test]
    fn test_bump_mismatch_aborts_before_write() {
        let mut versions = MemVersionStore::new(VersionRecord::new("abc"));

        let err = bump(&mut versions, &MemConfigStore(None), &date(2025, 1, 15)).unwrap_err();

        assert!(matches!(
            err,
            BumpError::Version(VersionError::FormatMismatch { .. })
        ));
        assert_eq!("abc", versions.record.version);
        assert_eq!(0, versions.puts);
    }

    #[test]
    fn test_bump_config_without_format_field_falls_back() {
        let mut versions = MemVersionStore::new(VersionRecord::new("25.1.4"));
        let config = MemConfigStore(Some(VersionConfig { format: None }));

        let outcome = bump(&mut versions, &config, &date(2025, 1, 15)).unwrap();

        assert_eq!("25.1.5", outcome.next);
    }

    #[test]
    fn test_bump_bad_configured_format_aborts_before_write() {
        let mut versions = MemVersionStore::new(VersionRecord::new("25.1.4"));

        let err = bump(
            &mut versions,
            &config_with("YYYY.YY.N"),
            &date(2025, 1, 15),
        )
        .unwrap_err();

        assert!(matches!(err, BumpError::Format(_)));
        assert_eq!(0, versions.puts);
    }
}
