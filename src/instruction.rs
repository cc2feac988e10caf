use crate::{
    error::InstructionError,
    version::{normalize_letter, PrePhase, Qualifier},
};
use core::fmt::{self, Display};

/// A symbolic update to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `release` or `date`: set the scheme's release numbers to the reference date.
    Release,
    /// `micro`, `patch` or `fix`: increment the release number right after the scheme's.
    Micro,
    /// `a`, `b`, `c`, `rc`, `alpha`, `beta`, `pre` or `preview`: start or increment a
    /// pre-release of the given phase.
    Pre(PrePhase),
    /// `post`, `rev` or `r`: start or increment a post-release.
    Post,
    /// `dev`: start or increment a development release.
    Dev,
}

impl Instruction {
    /// Looks up a symbol. Matching is exact and case-sensitive, so `RC` is not a symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "release" | "date" => Some(Instruction::Release),
            "micro" | "patch" | "fix" => Some(Instruction::Micro),
            "a" | "b" | "c" | "rc" | "alpha" | "beta" | "pre" | "preview" | "post" | "rev"
            | "r" | "dev" => match normalize_letter(symbol)? {
                Qualifier::Pre(phase) => Some(Instruction::Pre(phase)),
                Qualifier::Post => Some(Instruction::Post),
                Qualifier::Dev => Some(Instruction::Dev),
            },
            _ => None,
        }
    }

    /// Whether applying this instruction needs a reference date.
    pub fn uses_date(&self) -> bool {
        matches!(self, Instruction::Release)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Release => f.write_str("release"),
            Instruction::Micro => f.write_str("micro"),
            Instruction::Pre(phase) => write!(f, "{}", phase),
            Instruction::Post => f.write_str("post"),
            Instruction::Dev => f.write_str("dev"),
        }
    }
}

/// A parsed, comma-separated list of instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    /// Symbolic instructions, applied in order.
    Update(Vec<Instruction>),
    /// The whole instruction string was a single non-symbol, taken as the new version as is.
    Explicit(String),
}

impl Instructions {
    /// Splits `instructions` on commas.
    ///
    /// ```
    /// use calbump::{Instruction, Instructions, PrePhase};
    ///
    /// assert_eq!(
    ///     Ok(Instructions::Update(vec![Instruction::Release, Instruction::Pre(PrePhase::Beta)])),
    ///     Instructions::parse("date,beta"),
    /// );
    /// assert_eq!(
    ///     Ok(Instructions::Explicit("2024.1.1".to_string())),
    ///     Instructions::parse("2024.1.1"),
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [InstructionError::MultipleUpdateOperationsWithExplicitVersion] if there is more
    /// than one instruction and any of them is not a symbol.
    pub fn parse(instructions: &str) -> Result<Self, InstructionError> {
        let parts = instructions.split(',').collect::<Vec<_>>();
        let symbols = parts
            .iter()
            .map(|part| Instruction::from_symbol(part))
            .collect::<Option<Vec<_>>>();

        match symbols {
            Some(symbols) => Ok(Instructions::Update(symbols)),
            None if parts.len() == 1 => Ok(Instructions::Explicit(instructions.to_owned())),
            None => Err(
                InstructionError::MultipleUpdateOperationsWithExplicitVersion {
                    instructions: instructions.to_owned(),
                },
            ),
        }
    }
}
