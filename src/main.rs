use autover::{
    bump, setup, BumpError, Date, DateError, JsonConfigStore, JsonVersionStore, SetupError,
};
use clap::{Args, Parser, Subcommand};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Bump(#[from] BumpError),

    #[error("{0}")]
    Setup(#[from] SetupError),

    #[error("{0}")]
    Date(#[from] DateError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Date providers for calendar tokens. The hook normally wants the
/// committer's local date, so that's the default.
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct DateArgs {
    /// Use the current UTC date. Exclusive with other date providers.
    #[arg(long)]
    utc: bool,

    /// Use the current local date (the default). Exclusive with other date
    /// providers.
    #[arg(long)]
    local: bool,

    /// Use a fixed date. Exclusive with other date providers.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,
}

impl DateArgs {
    fn to_date(&self) -> Result<Date, DateError> {
        if self.utc {
            return Ok(Date::utc_now());
        }
        if let Some(date) = &self.date {
            return date.parse();
        }
        // --local, or no flag at all
        Ok(Date::local_now())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derives the next version and writes it back to version.json
    ///
    /// Reads version.json (and version-config.json when present) from the
    /// current directory, advances the patch counter or resets it if a
    /// tracked date unit rolled over, and persists the merged record.
    Bump {
        #[command(flatten)]
        date: DateArgs,
    },

    /// Seeds the version files and installs the pre-commit hook
    ///
    /// Run once from the repository root. Existing version.json and
    /// version-config.json files are left alone.
    Setup {
        #[command(flatten)]
        date: DateArgs,
    },
}

fn main() {
    // ignore the error if a subscriber is already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let cli = Cli::parse();

    match do_work(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Commands::Bump { date } => {
            let date = date.to_date()?;
            let mut versions = JsonVersionStore::new("version.json");
            let config = JsonConfigStore::new("version-config.json");
            let outcome = bump(&mut versions, &config, &date)?;
            Ok(format!(
                "Version bumped: {} -> {}",
                outcome.previous, outcome.next
            ))
        }
        Commands::Setup { date } => {
            let date = date.to_date()?;
            let root = std::env::current_dir()?;
            let report = setup(&root, &date)?;

            let mut lines = Vec::new();
            match &report.seeded_version {
                Some(version) => lines.push(format!("Created version.json ({version})")),
                None => lines.push("version.json already exists, skipping".to_owned()),
            }
            if report.seeded_config {
                lines.push("Created version-config.json".to_owned());
            } else {
                lines.push("version-config.json already exists, skipping".to_owned());
            }
            lines.push(format!(
                "Installed pre-commit hook at {}",
                report.hook_path.display()
            ));
            lines.push(String::new());
            lines.push("Auto-versioning is ready: the version bumps on every commit.".to_owned());
            lines.push(
                "Customize the format in version-config.json, e.g. YY.MM.N, YYYY.MM.DD.N, \
                 MAJORVERSION.MINORVERSION.N."
                    .to_owned(),
            );
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_accepts_a_fixed_date() {
        let cli = Cli::try_parse_from(["autover", "bump", "--date", "2025-01-15"]).unwrap();
        let Commands::Bump { date } = cli.command else {
            panic!("expected the bump subcommand");
        };
        assert_eq!(
            Date::explicit(2025, 1, 15).unwrap(),
            date.to_date().unwrap()
        );
    }

    #[test]
    fn test_date_providers_are_exclusive() {
        let res = Cli::try_parse_from(["autover", "bump", "--utc", "--local"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_unparseable_date_is_reported() {
        let cli = Cli::try_parse_from(["autover", "bump", "--date", "soon"]).unwrap();
        let Commands::Bump { date } = cli.command else {
            panic!("expected the bump subcommand");
        };
        assert!(matches!(
            date.to_date(),
            Err(DateError::UnparseableDate(..))
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["autover"]).is_err());
    }
}
