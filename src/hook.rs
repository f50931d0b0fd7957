use crate::{
    error::{BumpError, SetupError},
    format::Format,
    pipeline::DEFAULT_FORMAT,
    store::{ConfigStore, JsonConfigStore, JsonVersionStore, VersionConfig, VersionRecord, VersionStore},
    version::{Date, DateParts, VersionParts},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The pre-commit hook. It bumps the version and stages the record so the
/// new version rides along with the commit that triggered it.
const HOOK_SCRIPT: &str = "#!/bin/sh\nautover bump\ngit add version.json\nexit 0\n";

/// What [`setup`] did, for reporting back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    /// The initial version written to a fresh `version.json`, or `None`
    /// when the file already existed and was left alone.
    pub seeded_version: Option<String>,

    /// Whether a fresh `version-config.json` was written.
    pub seeded_config: bool,

    /// Where the pre-commit hook was installed.
    pub hook_path: PathBuf,
}

/// Prepares `project_root` for automatic version bumping.
///
/// Seeds `version.json` (an initial version rendered from the configured or
/// default format, with the patch counter at `1`) and `version-config.json`
/// when they don't exist, then installs an executable `pre-commit` hook
/// that runs the bump and stages the record. Existing files are never
/// overwritten, except the hook itself, which this tool owns.
///
/// # Errors
///
/// - [`SetupError::NotARepository`] when `project_root` has no `.git`
///   directory.
/// - [`SetupError::Io`] when a file cannot be written.
pub fn setup(project_root: &Path, date: &Date) -> Result<SetupReport, SetupError> {
    let git_dir = project_root.join(".git");
    if !git_dir.is_dir() {
        return Err(SetupError::NotARepository {
            path: project_root.to_path_buf(),
        });
    }

    let mut config_store = JsonConfigStore::new(project_root.join("version-config.json"));
    let mut version_store = JsonVersionStore::new(project_root.join("version.json"));

    let seeded_version = if version_store.exists() {
        None
    } else {
        let initial = initial_version(&config_store, date)?;
        version_store
            .put(&VersionRecord::new(initial.clone()))
            .map_err(BumpError::from)?;
        Some(initial)
    };

    let seeded_config = if config_store.exists() {
        false
    } else {
        config_store
            .put(&VersionConfig {
                format: Some(DEFAULT_FORMAT.to_owned()),
            })
            .map_err(BumpError::from)?;
        true
    };

    let hooks_dir = git_dir.join("hooks");
    fs::create_dir_all(&hooks_dir).map_err(|source| SetupError::Io {
        path: hooks_dir.clone(),
        source,
    })?;

    let hook_path = hooks_dir.join("pre-commit");
    fs::write(&hook_path, HOOK_SCRIPT).map_err(|source| SetupError::Io {
        path: hook_path.clone(),
        source,
    })?;
    make_executable(&hook_path)?;

    Ok(SetupReport {
        seeded_version,
        seeded_config,
        hook_path,
    })
}

/// Renders the version a fresh repository starts from: today's date fields
/// with the patch counter at `1`, in the configured or default format.
fn initial_version(config: &JsonConfigStore, date: &Date) -> Result<String, SetupError> {
    let format_string = config
        .get()
        .map_err(BumpError::from)?
        .and_then(|config| config.format)
        .unwrap_or_else(|| DEFAULT_FORMAT.to_owned());
    let format = Format::compile(&format_string).map_err(BumpError::from)?;
    let today = DateParts::for_date(date).map_err(BumpError::from)?;
    let initial = format
        .render(&VersionParts::initial(&today, 1, 0))
        .map_err(BumpError::from)?;
    Ok(initial)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), SetupError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        SetupError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), SetupError> {
    // git on Windows runs hooks without an executable bit
    Ok(())
}
