use calbump::{
    BumpError, CalverScheme, ConfigError, Date, DateError, SchemeConfig, SchemeError,
    SchemeTemplate, Version, VersionScheme, DEFAULT_SCHEME_TEMPLATE,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "CALBUMP_LOG";

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Bump(#[from] BumpError),

    #[error("{0}")]
    Scheme(#[from] SchemeError),

    #[error("{0}")]
    Date(#[from] DateError),

    #[error("{}: {source}", path.display())]
    Config { path: PathBuf, source: ConfigError },

    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Date providers. When none is given, the current UTC date is used.
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct DateArg {
    /// [DATE PROVIDER] Use the current UTC date to render calendar parts. Exclusive with other
    /// date providers.
    #[arg(long)]
    utc: bool,

    /// [DATE PROVIDER] Use the current local date to render calendar parts. Exclusive with
    /// other date providers.
    #[arg(long)]
    local: bool,

    /// [DATE PROVIDER] Use a date in format `YYYY-MM-DD` to render calendar parts. Exclusive
    /// with other date providers.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,
}

impl DateArg {
    fn to_date(&self) -> Result<Option<Date>, CliError> {
        // this struct acts like an enumeration since multiple is false
        if self.utc {
            return Ok(Some(Date::utc_now()));
        }
        if self.local {
            return Ok(Some(Date::local_now()));
        }
        if let Some(date) = &self.date {
            return Ok(Some(date.parse()?));
        }
        Ok(None)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more to stderr. Repeat for even more. Overridden by the `CALBUMP_LOG` environment
    /// variable.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bumps a version according to comma-separated instructions.
    ///
    /// Instructions are `release`/`date`, `micro`/`patch`/`fix`, `a`/`alpha`, `b`/`beta`,
    /// `c`/`rc`/`pre`/`preview`, `post`/`rev`/`r` and `dev`. A single instruction that is none
    /// of these is taken as the new version. Empty instructions keep the version as is.
    Bump {
        /// The version string to bump
        version: String,

        /// The instructions, like `date,patch`
        instructions: String,

        /// The scheme template. Overrides the config file. [default: YYYY.MM.DD]
        #[arg(short, long)]
        scheme: Option<String>,

        /// Don't check that the bumped version is greater than VERSION
        #[arg(long)]
        no_validate: bool,

        /// A TOML file to read options from. A `pyproject.toml` is read from its
        /// `[tool.hatch.version]` table.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        date: DateArg,
    },

    /// Validates that a version is a PEP 440 version, and, if given, that a scheme template
    /// only has calendar parts
    Valid {
        /// The version string to validate
        version: String,

        /// The scheme template to validate
        #[arg(short, long)]
        scheme: Option<String>,
    },

    /// Renders a scheme template for a date
    Format {
        /// The scheme template
        #[arg(short, long, default_value = DEFAULT_SCHEME_TEMPLATE)]
        scheme: String,

        #[command(flatten)]
        date: DateArg,
    },
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("calbump={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(path: &Path) -> Result<SchemeConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })?;
    let is_pyproject = path.file_name().is_some_and(|name| name == "pyproject.toml");
    let config = if is_pyproject {
        SchemeConfig::from_pyproject_str(&contents)
    } else {
        SchemeConfig::from_toml_str(&contents)
    };
    config.map_err(|source| CliError::Config {
        path: path.to_owned(),
        source,
    })
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Commands::Bump {
            version,
            instructions,
            scheme,
            no_validate,
            config,
            date,
        } => {
            let mut scheme_config = match &config {
                Some(path) => load_config(path)?,
                None => SchemeConfig::default(),
            };
            if let Some(scheme) = scheme {
                scheme_config.scheme_template = scheme;
            }
            if no_validate {
                scheme_config.validate_monotonicity = false;
            }
            debug!(?scheme_config, "resolved options");

            let mut calver = CalverScheme::new(scheme_config);
            if let Some(date) = date.to_date()? {
                calver = calver.with_date(date);
            }
            Ok((calver.update(&instructions, &version)?, 0))
        }
        Commands::Valid { version, scheme } => {
            let valid = Version::parse(&version).is_ok()
                && scheme.map_or(true, |scheme| scheme.parse::<SchemeTemplate>().is_ok());
            Ok(if valid {
                ("true".to_string(), 0)
            } else {
                ("false".to_string(), 1)
            })
        }
        Commands::Format { scheme, date } => {
            let date = date.to_date()?.unwrap_or_else(Date::utc_now);
            let formatted = SchemeTemplate::new(&scheme).format(&date)?;
            Ok((formatted.join("."), 0))
        }
    }
}
