//! # calbump
//!
//! A library for bumping calendar versions that stay valid
//! [PEP 440](https://peps.python.org/pep-0440/) versions.
//!
//! A version like `2024.09.16.2rc1` is read as a PEP 440 version whose first release numbers
//! follow a *scheme template* (here `YYYY.0M.DD`), and whose remaining parts (a patch counter,
//! pre-, post- and dev-releases) are bumped by a small instruction language.
//!
//! ## Examples
//!
//! Quickly get a next version:
//!
//! ```
//! use calbump::prelude::*;
//!
//! let date = Date::explicit(2024, 9, 16).unwrap();
//!
//! let next = bump_version(
//!     "2024.09.10.1",   // current version string
//!     "date,rc",        // instructions
//!     "YYYY.0M.DD",     // scheme template
//!     Some(&date),      // the date to update to, or `None` for the current UTC date
//! ).unwrap();
//! assert_eq!(next, "2024.09.16.1rc0");
//! ```
//!
//! Or, go through the [CalverScheme], which also checks that versions only move forward:
//!
//! ```
//! use calbump::prelude::*;
//!
//! let config = SchemeConfig::from_toml_str(r#"scheme-template = "YY.0M""#).unwrap();
//! let scheme = CalverScheme::new(config).with_date(Date::explicit(2024, 9, 16).unwrap());
//! assert_eq!("24.09.1", scheme.update("patch", "24.09").unwrap());
//! assert!(scheme.update("date", "24.10").is_err());
//! ```
//!
//! ## Scheme Templates
//!
//! A scheme template is a dot-separated list of calendar parts. The *n*th part describes the
//! *n*th release number of a version. In the "Example" column below, we reference a date of
//! `2005-02-03` (in ISO week 5).
//!
//! | Part | Example | Padded to | Description | Reference |
//! |---|---|---|---|---|
//! | `YYYY` | `2005` | 4 | Full year. | [1] |
//! | `YY` | `5` | 2 | The last two digits of the year, without zero-padding. | [1] |
//! | `0Y` | `05` | 2 | Same as `YY` but zero-padded to 2 characters. | [1] |
//! | `MM` | `2` | 1 | Month (`1`–`12`). | [1] |
//! | `0M` | `02` | 2 | Same as `MM` but zero-padded to 2 characters. | [1] |
//! | `WW` | `5` | 1 | ISO 8601 week of the year (`1`–`53`). | [1] |
//! | `0W` | `05` | 2 | Same as `WW` but zero-padded to 2 characters. | [1] |
//! | `DD` | `3` | 1 | Day of the month (`1`–`31`). | [1] |
//! | `0D` | `03` | 2 | Same as `DD` but zero-padded to 2 characters. | [1] |
//!
//! [1]: https://calver.org/#scheme
//!
//! PEP 440 strips leading zeros from release numbers, so when a version is rendered, each
//! release number covered by the template is zero-padded back to the width in the "Padded to"
//! column. Note that this also pads values *formatted* without padding: `YY` in 2005 is
//! rendered as `05`.
//!
//! ## Instructions
//!
//! See [bump_version] for the instruction language.
//!
//! ## Prelude
//!
//! calbump provides a prelude module for convenience. It contains everything needed to
//! interact with the library.
//!
//! Use it with:
//!
//! ```
//! use calbump::prelude::*;
//! ```
#![warn(missing_docs)]

mod bump;
pub mod config;
mod date;
mod error;
mod instruction;
mod scheme;
mod template;
mod version;

pub use crate::bump::{bump_version, DEFAULT_SCHEME_TEMPLATE};
pub use crate::config::SchemeConfig;
pub use crate::date::Date;
pub use crate::error::{
    BumpError, ConfigError, DateError, InstructionError, ParseVersionError, SchemeError,
};
pub use crate::instruction::{Instruction, Instructions};
pub use crate::scheme::{CalverScheme, VersionScheme};
pub use crate::template::{NonYearType, SchemePart, SchemeTemplate, SchemeToken, YearType};
pub use crate::version::{
    normalize_letter, LocalSegment, PrePhase, PreRelease, Qualifier, Version, VersionUpdate,
};

/// A convenience module appropriate for glob imports (`use calbump::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::bump_version;
    #[doc(no_inline)]
    pub use crate::BumpError;
    #[doc(no_inline)]
    pub use crate::CalverScheme;
    #[doc(no_inline)]
    pub use crate::Date;
    #[doc(no_inline)]
    pub use crate::SchemeConfig;
    #[doc(no_inline)]
    pub use crate::SchemeTemplate;
    #[doc(no_inline)]
    pub use crate::Version;
    #[doc(no_inline)]
    pub use crate::VersionScheme;
}
