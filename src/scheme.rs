use crate::{
    bump::bump_version, config::SchemeConfig, date::Date, error::BumpError, version::Version,
};
use tracing::{debug, instrument};

/// A version scheme a build tool can delegate version updates to.
pub trait VersionScheme {
    /// The name the scheme is registered under.
    fn name(&self) -> &'static str;

    /// Returns the version that `desired_version` turns `original_version` into.
    fn update(&self, desired_version: &str, original_version: &str) -> Result<String, BumpError>;
}

/// The calendar version scheme, registered as `calver`.
///
/// It wraps [bump_version]: an empty `desired_version` leaves the version as is, and, unless
/// [SchemeConfig::validate_monotonicity] is off, a bump must produce a greater version.
///
/// ```
/// use calbump::{CalverScheme, Date, SchemeConfig, VersionScheme};
///
/// let scheme = CalverScheme::new(SchemeConfig::default())
///     .with_date(Date::explicit(2024, 9, 16).unwrap());
/// assert_eq!("2024.9.16", scheme.update("date", "2024.9.1").unwrap());
/// assert_eq!("2024.9.1", scheme.update("", "2024.9.1").unwrap());
/// assert!(scheme.update("2024.1.1", "2024.9.1").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalverScheme {
    config: SchemeConfig,
    date: Option<Date>,
}

impl CalverScheme {
    /// The name of this scheme.
    pub const PLUGIN_NAME: &'static str = "calver";

    /// Returns a scheme with the given options, rendering dates from the current UTC date.
    pub fn new(config: SchemeConfig) -> Self {
        Self { config, date: None }
    }

    /// Renders dates from `date` instead of the current UTC date.
    pub fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// The options of this scheme.
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }
}

impl VersionScheme for CalverScheme {
    fn name(&self) -> &'static str {
        Self::PLUGIN_NAME
    }

    /// # Errors
    ///
    /// - Any error of [bump_version].
    /// - [BumpError::Version] if the bumped version is not a PEP 440 version (possible with an
    ///   explicit version) and validation is on.
    /// - [BumpError::NonMonotonicVersion] if the bumped version is not greater than
    ///   `original_version` and validation is on.
    #[instrument(skip(self))]
    fn update(&self, desired_version: &str, original_version: &str) -> Result<String, BumpError> {
        if desired_version.is_empty() {
            debug!("no instructions, keeping version");
            return Ok(original_version.to_owned());
        }

        let version = bump_version(
            original_version,
            desired_version,
            &self.config.scheme_template,
            self.date.as_ref(),
        )?;

        if self.config.validate_monotonicity
            && Version::parse(&version)? <= Version::parse(original_version)?
        {
            return Err(BumpError::NonMonotonicVersion {
                version,
                original: original_version.to_owned(),
            });
        }
        Ok(version)
    }
}
