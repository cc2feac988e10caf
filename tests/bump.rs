use calbump::prelude::*;
use calbump::{InstructionError, SchemeError};
use rstest::*;

#[fixture]
fn date() -> Date {
    Date::explicit(2024, 9, 16).unwrap()
}

#[rstest]
#[case("0", "release", "YYYY.MM.DD", "2024.9.16")]
#[case("0", "date", "YYYY.0M.DD", "2024.09.16")]
#[case("2024.09.16", "patch", "YYYY.0M.DD", "2024.09.16.1")]
#[case("2024.09.16", "a,alpha", "YYYY.0M.DD", "2024.09.16a1")]
#[case(
    "2024.09.10.1.post3",
    "date,patch,micro,fix,post,post",
    "YY.0M.DD",
    "24.09.16.4.post1"
)]
fn test_scenarios(
    date: Date,
    #[case] original: &str,
    #[case] desired: &str,
    #[case] scheme: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        expected,
        bump_version(original, desired, scheme, Some(&date)).unwrap()
    );
}

#[rstest]
fn test_patch_twice(date: Date) {
    let once = bump_version("2024.09.16", "patch", "YYYY.0M.DD", Some(&date)).unwrap();
    let twice = bump_version(&once, "patch", "YYYY.0M.DD", Some(&date)).unwrap();
    assert_eq!("2024.09.16.2", twice);
}

#[rstest]
fn test_explicit_version_with_other_instructions(date: Date) {
    assert_eq!(
        Err(BumpError::Instruction(
            InstructionError::MultipleUpdateOperationsWithExplicitVersion {
                instructions: "2024.8.15,patch".to_string()
            }
        )),
        bump_version("0", "2024.8.15,patch", "YYYY.MM.DD", Some(&date))
    );
}

#[rstest]
fn test_unrecognized_scheme_token(date: Date) {
    assert!(matches!(
        bump_version("0", "date", "HEY.THERE", Some(&date)),
        Err(BumpError::Scheme(SchemeError::UnrecognizedSchemeToken { .. }))
    ));
}

#[test]
fn test_smoke_without_date() {
    assert!(!bump_version("0", "date", "YYYY.MM.DD", None)
        .unwrap()
        .is_empty());
}

/// A release train: every step goes through the validating scheme, so each version must sort
/// after the one before it.
#[test]
fn test_release_train() {
    let config = SchemeConfig::from_pyproject_str(
        r#"
        [tool.hatch.version]
        calver-scheme = "YYYY.0M.0D"
        "#,
    )
    .unwrap();

    let steps = [
        ("2024-09-03", "date", "2024.09.03"),
        ("2024-09-03", "patch,a", "2024.09.03.1a0"),
        ("2024-09-03", "a", "2024.09.03.1a1"),
        ("2024-09-03", "rc", "2024.09.03.1rc0"),
        ("2024-09-03", "patch", "2024.09.03.2"),
        ("2024-09-03", "post", "2024.09.03.2.post0"),
        ("2024-10-01", "date,dev", "2024.10.01.2.dev0"),
        ("2024-10-01", "release", "2024.10.01.2"),
        ("2024-10-01", "", "2024.10.01.2"),
    ];

    let mut current = "0".to_string();
    for (date, instructions, expected) in steps {
        let scheme = CalverScheme::new(config.clone()).with_date(date.parse().unwrap());
        current = scheme.update(instructions, &current).unwrap();
        assert_eq!(expected, current);
    }
}
