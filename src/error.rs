/// Errors that occur when parsing a version string.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseVersionError {
    /// The string is not a valid PEP 440 version.
    #[error("Invalid version: `{version}`")]
    InvalidVersion {
        /// The string that failed to parse.
        version: String,
    },
}

/// Errors that occur when creating a [Date](crate::Date).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DateError {
    /// Year, month and day do not name a real date.
    #[error("Explicit year ({year}), month ({month}), and day ({day}) arguments cannot be made into a valid date")]
    InvalidDateArguments {
        /// The year argument.
        year: i32,
        /// The month argument.
        month: u32,
        /// The day argument.
        day: u32,
    },

    /// The date string could not be parsed.
    #[error("Could not parse date: {reason}")]
    UnparseableDate {
        /// The reason from chrono.
        reason: String,
    },
}

impl From<chrono::ParseError> for DateError {
    fn from(err: chrono::ParseError) -> Self {
        DateError::UnparseableDate {
            reason: err.to_string(),
        }
    }
}

/// Errors that occur when rendering a scheme template against a date.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum SchemeError {
    /// A token of the template is not part of the calendar vocabulary.
    #[error("Unknown calver-scheme part: {token} (expected one of {expected})")]
    UnrecognizedSchemeToken {
        /// The offending token.
        token: String,
        /// The recognized tokens, comma-separated.
        expected: String,
    },

    /// The year cannot be expressed as a release number.
    #[error("Year `{year}` should not be negative when formatted")]
    NegativeYear {
        /// The year of the reference date.
        year: i32,
    },
}

/// Errors that occur when reading an instruction list.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum InstructionError {
    /// An explicit version was combined with other instructions.
    #[error("Cannot specify multiple update operations with an explicit version: `{instructions}`")]
    MultipleUpdateOperationsWithExplicitVersion {
        /// The full instruction string.
        instructions: String,
    },
}

/// Errors that occur when loading a [SchemeConfig](crate::SchemeConfig).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be deserialized.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Any error that can happen while bumping a version.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum BumpError {
    /// See [ParseVersionError].
    #[error(transparent)]
    Version(#[from] ParseVersionError),

    /// See [SchemeError].
    #[error(transparent)]
    Scheme(#[from] SchemeError),

    /// See [InstructionError].
    #[error(transparent)]
    Instruction(#[from] InstructionError),

    /// The bumped version does not sort after the original one.
    #[error("Version `{version}` is not higher than the original version `{original}`")]
    NonMonotonicVersion {
        /// The bumped version.
        version: String,
        /// The version that was bumped.
        original: String,
    },

    /// The counter an instruction increments is already at its largest value.
    #[error("Cannot apply `{instruction}` to `{version}`: its counter is at the maximum value")]
    CounterOverflow {
        /// The version the instruction was applied to.
        version: String,
        /// The instruction.
        instruction: String,
    },
}
