use crate::{
    date::Date,
    error::BumpError,
    instruction::{Instruction, Instructions},
    template::SchemeTemplate,
    version::{PreRelease, Version, VersionUpdate},
};
use tracing::{debug, instrument};

/// The scheme template used when none is configured.
pub const DEFAULT_SCHEME_TEMPLATE: &str = "YYYY.MM.DD";

/// Bumps `original_version` according to `desired_version`, a comma-separated list of
/// instructions, and returns the new version string.
///
/// The first release numbers of the version are calendar values, one per dot-separated part
/// of `scheme_template` (see [SchemeTemplate]). Instructions are applied in order, each
/// seeing the result of the previous one:
///
/// | Instruction | Effect |
/// |---|---|
/// | `release`, `date` | Sets the scheme's release numbers to `date`. Later release numbers are kept. |
/// | `micro`, `patch`, `fix` | Increments the release number right after the scheme's (from an implicit `0`), and drops any after it. |
/// | `a`, `alpha`, `b`, `beta`, `c`, `rc`, `pre`, `preview` | Starts a pre-release of that phase at `0`, or increments it if the version already is one. |
/// | `post`, `rev`, `r` | Starts a post-release at `0`, or increments it. |
/// | `dev` | Starts a dev release at `0`, or increments it. |
///
/// Each of them drops the parts of the version that come after the part it sets (so `patch`
/// drops pre, post and dev releases, and `rc` drops post and dev releases).
///
/// Anything else is taken as an explicit version and returned as is, but only if it is the
/// sole instruction.
///
/// The scheme's release numbers are zero-padded back to the width of their part, so `0M`
/// stays two digits wide. If `date` is `None`, the current UTC date is used.
///
/// # Examples
///
/// ```
/// use calbump::{bump_version, Date};
///
/// let date = Date::explicit(2024, 9, 16).unwrap();
/// assert_eq!(
///     "2024.09.16",
///     bump_version("0", "date", "YYYY.0M.DD", Some(&date)).unwrap()
/// );
/// assert_eq!(
///     "24.09.16.4.post1",
///     bump_version("2024.09.10.1.post3", "date,patch,micro,fix,post,post", "YY.0M.DD", Some(&date)).unwrap()
/// );
/// ```
///
/// # Errors
///
/// - [BumpError::Version] if `original_version` is not a PEP 440 version.
/// - [BumpError::Instruction] if an explicit version is combined with other instructions.
/// - [BumpError::Scheme] if a date instruction meets a template token that isn't a calendar
///   part, or a year the template can't express.
/// - [BumpError::CounterOverflow] if a counter to increment is already [u64::MAX].
#[instrument]
pub fn bump_version(
    original_version: &str,
    desired_version: &str,
    scheme_template: &str,
    date: Option<&Date>,
) -> Result<String, BumpError> {
    let template = SchemeTemplate::new(scheme_template);
    let mut version = Version::parse(original_version)?;

    let instructions = match Instructions::parse(desired_version)? {
        Instructions::Explicit(explicit) => {
            debug!(%explicit, "using explicit version");
            return Ok(explicit);
        }
        Instructions::Update(instructions) => instructions,
    };

    let reference_date = date.copied().or_else(|| {
        instructions
            .iter()
            .any(Instruction::uses_date)
            .then(Date::utc_now)
    });
    if let Some(date) = &reference_date {
        debug!(%date, "using reference date");
    }

    for instruction in &instructions {
        version = apply(&version, instruction, &template, reference_date)?;
        debug!(%instruction, %version, "applied instruction");
    }

    // `Version` keeps release numbers as integers, which loses zero-padding like the `09` of a
    // `0M` part. Pad them back to their part's width.
    Ok(version.to_padded_string(&template.min_widths()))
}

/// Applies one instruction.
fn apply(
    version: &Version,
    instruction: &Instruction,
    template: &SchemeTemplate,
    reference_date: Option<Date>,
) -> Result<Version, BumpError> {
    let increment = |counter: u64| {
        counter
            .checked_add(1)
            .ok_or_else(|| BumpError::CounterOverflow {
                version: version.to_string(),
                instruction: instruction.to_string(),
            })
    };

    let scheme_len = template.len();
    let update = match instruction {
        Instruction::Release => {
            let date = reference_date.unwrap_or_else(Date::utc_now);
            let mut release = template.values(&date)?;
            release.extend(version.release().iter().skip(scheme_len));
            VersionUpdate::new().release(release)
        }
        Instruction::Micro => {
            let current = version.release();
            let micro = current.get(scheme_len).copied().unwrap_or(0);
            let mut release = current[..scheme_len.min(current.len())].to_vec();
            release.push(increment(micro)?);
            VersionUpdate::new().release(release)
        }
        Instruction::Pre(phase) => {
            let number = match version.pre() {
                Some(pre) if pre.phase == *phase => increment(pre.number)?,
                _ => 0,
            };
            VersionUpdate::new().pre(Some(PreRelease::new(*phase, number)))
        }
        Instruction::Post => {
            let post = version.post().map_or(Ok(0), increment)?;
            VersionUpdate::new().post(Some(post))
        }
        Instruction::Dev => {
            let dev = version.dev().map_or(Ok(0), increment)?;
            VersionUpdate::new().dev(Some(dev))
        }
    };
    Ok(version.updated(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InstructionError, ParseVersionError, SchemeError};
    use rstest::*;

    #[fixture]
    fn date() -> Date {
        Date::explicit(2024, 9, 16).unwrap()
    }

    #[rstest]
    // `release`/`date` set the scheme's release numbers to the date
    #[case("0", "release", "YYYY.MM.DD", "2024.9.16")]
    #[case("0", "date", "YYYY.0M.DD", "2024.09.16")]
    #[case("0.0", "date", "YY.WW", "24.38")]
    #[case("2023.1.2.7", "date", "YYYY.MM.DD", "2024.9.16.7")]
    #[case("2023.1.2.7rc1", "date", "YYYY.MM.DD", "2024.9.16.7")]
    // patch
    #[case("2024.09.16", "patch", "YYYY.0M.DD", "2024.09.16.1")]
    #[case("2024.09.16.1", "patch", "YYYY.0M.DD", "2024.09.16.2")]
    #[case("2024.09.16.1.5.6", "fix", "YYYY.0M.DD", "2024.09.16.2")]
    #[case("2024.09.16.1rc2", "micro", "YYYY.0M.DD", "2024.09.16.2")]
    // pre-releases
    #[case("2024.09.16", "a,alpha", "YYYY.0M.DD", "2024.09.16a1")]
    #[case("2024.09.16", "b,beta,b", "YYYY.0M.DD", "2024.09.16b2")]
    #[case("2024.09.16", "c,pre,rc", "YYYY.M.DD", "2024.9.16rc2")]
    #[case("2024.09.16a3", "b", "YYYY.0M.DD", "2024.09.16b0")]
    #[case("2024.09.16a3.post1.dev2", "a", "YYYY.0M.DD", "2024.09.16a4")]
    // post-releases
    #[case("2024.09.16", "post,rev,r", "YYYY.0M.DD", "2024.09.16.post2")]
    #[case("2024.09.16.post4.dev1", "post", "YYYY.0M.DD", "2024.09.16.post5")]
    // dev
    #[case("2024.09.16", "dev", "YYYY.M.DD", "2024.9.16.dev0")]
    #[case("2024.09.16.dev0", "dev", "YYYY.M.DD", "2024.9.16.dev1")]
    // weird long instructions
    #[case("2024.09.16.42", "patch,micro,fix,post,post", "YYYY.0M.DD", "2024.09.16.45.post1")]
    #[case(
        "2024.09.10.1.post3",
        "date,patch,micro,fix,post,post",
        "YY.0M.DD",
        "24.09.16.4.post1"
    )]
    // the date isn't touched without `release`/`date`
    #[case("2023", "patch", "YYYY", "2023.1")]
    #[case("2023.12", "patch", "YYYY.MM", "2023.12.1")]
    // zero-padding lost by parsing is restored
    #[case("2024.9.3", "patch", "YYYY.0M.0D", "2024.09.03.1")]
    #[case("1!2024.9.3+local.1", "dev", "YYYY.0M.0D", "1!2024.09.03.dev0")]
    // explicit versions
    #[case("0", "2024.1.1", "this won't matter", "2024.1.1")]
    #[case("2024.09.16", "2024.09.17", "YYYY.MM.DD", "2024.09.17")]
    fn test_bump(
        date: Date,
        #[case] original: &str,
        #[case] desired: &str,
        #[case] scheme: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            Ok(expected.to_string()),
            bump_version(original, desired, scheme, Some(&date))
        );
    }

    #[rstest]
    #[case("0", "YYYY.0M.DD")]
    #[case("2023.01.02.5", "YYYY.0M.DD")]
    #[case("2023.01.5", "0Y.WW")]
    #[case("2023.01.5rc1", "YYYY.DD")]
    fn test_release_is_idempotent(date: Date, #[case] original: &str, #[case] scheme: &str) {
        let once = bump_version(original, "date", scheme, Some(&date)).unwrap();
        let twice = bump_version(original, "date,release", scheme, Some(&date)).unwrap();
        let again = bump_version(&once, "release", scheme, Some(&date)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, again);
    }

    #[rstest]
    fn test_patch_strictly_increases(date: Date) {
        let mut current = "2024.09.16".to_string();
        let mut previous = Version::parse(&current).unwrap();
        for expected_micro in 1..=12 {
            current = bump_version(&current, "patch", "YYYY.0M.DD", Some(&date)).unwrap();
            assert_eq!(format!("2024.09.16.{expected_micro}"), current);

            let next = Version::parse(&current).unwrap();
            assert!(previous < next);
            previous = next;
        }
    }

    #[rstest]
    #[case("a", "a", "2024.9.16a1")]
    #[case("a", "b", "2024.9.16b0")]
    #[case("rc", "b", "2024.9.16b0")]
    #[case("alpha", "a", "2024.9.16a1")]
    #[case("preview", "c", "2024.9.16rc1")]
    fn test_pre_phase_switch(
        date: Date,
        #[case] first: &str,
        #[case] second: &str,
        #[case] expected: &str,
    ) {
        let fresh = bump_version("2024.9.16", first, "YYYY.MM.DD", Some(&date)).unwrap();
        assert!(fresh.ends_with('0'));
        let switched = bump_version(&fresh, second, "YYYY.MM.DD", Some(&date)).unwrap();
        assert_eq!(expected, switched);
    }

    #[rstest]
    fn test_pre_phase_switch_resets_high_number(date: Date) {
        let bumped = bump_version("2024.9.16", "a,a,a,a,a", "YYYY.MM.DD", Some(&date)).unwrap();
        assert_eq!("2024.9.16a4", bumped);
        let bumped = bump_version(&bumped, "b", "YYYY.MM.DD", Some(&date)).unwrap();
        assert_eq!("2024.9.16b0", bumped);
    }

    #[rstest]
    fn test_explicit_with_others(date: Date) {
        assert_eq!(
            Err(BumpError::Instruction(
                InstructionError::MultipleUpdateOperationsWithExplicitVersion {
                    instructions: "2024.8.15,patch".to_string()
                }
            )),
            bump_version("0", "2024.8.15,patch", DEFAULT_SCHEME_TEMPLATE, Some(&date))
        );
    }

    #[rstest]
    fn test_unrecognized_scheme_token(date: Date) {
        let err = bump_version("0", "date", "HEY.THERE", Some(&date)).unwrap_err();
        assert!(matches!(
            err,
            BumpError::Scheme(SchemeError::UnrecognizedSchemeToken { ref token, .. }) if token == "HEY"
        ));
        assert!(err.to_string().starts_with("Unknown calver-scheme part: HEY"));
    }

    #[rstest]
    fn test_unrecognized_scheme_token_without_date_instruction(date: Date) {
        // only `release`/`date` need the template to be made of calendar parts
        assert_eq!(
            Ok("1.2.1".to_string()),
            bump_version("1.2", "patch", "HEY.THERE", Some(&date))
        );
        // no date is resolved either
        assert_eq!(
            Ok("1.2.1rc0".to_string()),
            bump_version("1.2", "patch,rc", "HEY.THERE", None)
        );
    }

    #[rstest]
    fn test_invalid_original(date: Date) {
        assert_eq!(
            Err(BumpError::Version(ParseVersionError::InvalidVersion {
                version: "not a version".to_string()
            })),
            bump_version("not a version", "patch", DEFAULT_SCHEME_TEMPLATE, Some(&date))
        );
    }

    #[rstest]
    #[case("2024.9.16.18446744073709551615", "patch", "micro")]
    #[case("2024.9.16.post18446744073709551615", "post", "post")]
    #[case("2024.9.16rc18446744073709551615", "rc", "rc")]
    #[case("2024.9.16.dev18446744073709551615", "dev", "dev")]
    fn test_counter_at_max(
        date: Date,
        #[case] original: &str,
        #[case] instructions: &str,
        #[case] instruction: &str,
    ) {
        assert_eq!(
            Err(BumpError::CounterOverflow {
                version: original.to_string(),
                instruction: instruction.to_string(),
            }),
            bump_version(original, instructions, "YYYY.MM.DD", Some(&date))
        );
    }

    #[rstest]
    // the counter being bumped is not the one at its maximum
    #[case("2024.9.16rc18446744073709551615", "b", "2024.9.16b0")]
    #[case("2024.9.16.post18446744073709551615", "patch", "2024.9.16.1")]
    #[case("2024.9.16.18446744073709551615", "post", "2024.9.16.18446744073709551615.post0")]
    fn test_counter_at_max_untouched(
        date: Date,
        #[case] original: &str,
        #[case] instructions: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            Ok(expected.to_string()),
            bump_version(original, instructions, "YYYY.MM.DD", Some(&date))
        );
    }

    #[test]
    fn test_no_date_uses_today() {
        let bumped = bump_version("0", "date", DEFAULT_SCHEME_TEMPLATE, None).unwrap();
        let version = Version::parse(&bumped).unwrap();
        assert_eq!(3, version.release().len());
        assert!(version > Version::new([2024, 9, 16]));
    }
}
