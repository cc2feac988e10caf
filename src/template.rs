use crate::{date::Date, error::SchemeError};
use chrono::Datelike;
use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// How a year is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearType {
    /// `YYYY`
    Full,
    /// `YY`
    Short,
    /// `0Y`
    ZeroPadded,
}

/// How a month, week or day is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonYearType {
    /// `MM`, `WW`, `DD`
    Short,
    /// `0M`, `0W`, `0D`
    ZeroPadded,
}

/// A calendar part of a scheme template, like `YYYY` or `0M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemePart {
    /// A year.
    Year(YearType),
    /// A month of the year (`1`–`12`).
    Month(NonYearType),
    /// An ISO 8601 week of the year (`1`–`53`).
    Week(NonYearType),
    /// A day of the month (`1`–`31`).
    Day(NonYearType),
}

impl SchemePart {
    /// Every recognized part, in the order they are listed in error messages.
    pub const ALL: [SchemePart; 9] = [
        SchemePart::Year(YearType::Full),
        SchemePart::Year(YearType::Short),
        SchemePart::Year(YearType::ZeroPadded),
        SchemePart::Month(NonYearType::Short),
        SchemePart::Month(NonYearType::ZeroPadded),
        SchemePart::Week(NonYearType::Short),
        SchemePart::Week(NonYearType::ZeroPadded),
        SchemePart::Day(NonYearType::Short),
        SchemePart::Day(NonYearType::ZeroPadded),
    ];

    /// The token for this part in a scheme template.
    pub fn pattern(&self) -> &'static str {
        use SchemePart::*;
        match self {
            Year(type_) => match type_ {
                YearType::Full => "YYYY",
                YearType::Short => "YY",
                YearType::ZeroPadded => "0Y",
            },
            Month(type_) => match type_ {
                NonYearType::Short => "MM",
                NonYearType::ZeroPadded => "0M",
            },
            Week(type_) => match type_ {
                NonYearType::Short => "WW",
                NonYearType::ZeroPadded => "0W",
            },
            Day(type_) => match type_ {
                NonYearType::Short => "DD",
                NonYearType::ZeroPadded => "0D",
            },
        }
    }

    /// Looks up a part by its exact token.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.pattern() == pattern)
    }

    /// The number of characters this part is formatted to, at least.
    ///
    /// Note that `YYYY` and `YY` are not zero-padded when formatted from a date, but they still
    /// get padded back to this width when a version is rendered.
    pub fn min_width(&self) -> usize {
        use SchemePart::*;
        match self {
            Year(YearType::Full) => 4,
            Year(_) => 2,
            Month(type_) | Week(type_) | Day(type_) => match type_ {
                NonYearType::Short => 1,
                NonYearType::ZeroPadded => 2,
            },
        }
    }

    fn zero_pad_len(&self) -> Option<usize> {
        use SchemePart::*;
        match self {
            Year(YearType::ZeroPadded)
            | Month(NonYearType::ZeroPadded)
            | Week(NonYearType::ZeroPadded)
            | Day(NonYearType::ZeroPadded) => Some(2),
            _ => None,
        }
    }

    /// The numeric value of this part for `date`.
    ///
    /// # Errors
    ///
    /// Returns [SchemeError::NegativeYear] for a `YYYY` part and a date before year 0.
    pub fn value(&self, date: &Date) -> Result<u64, SchemeError> {
        use SchemePart::*;
        let date = date.naive();
        let value = match self {
            Year(YearType::Full) => {
                let year = date.year();
                u64::try_from(year).map_err(|_| SchemeError::NegativeYear { year })?
            }
            Year(_) => u64::from(date.year().rem_euclid(100).unsigned_abs()),
            Month(_) => u64::from(date.month()),
            Week(_) => u64::from(date.iso_week().week()),
            Day(_) => u64::from(date.day()),
        };
        Ok(value)
    }

    /// Formats a value of this part, zero-padding it if the part calls for it.
    pub fn format_value(&self, value: u64) -> String {
        match self.zero_pad_len() {
            Some(len) => format!("{:0len$}", value, len = len),
            None => value.to_string(),
        }
    }
}

impl Display for SchemePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

fn expected_patterns() -> String {
    SchemePart::ALL
        .iter()
        .map(SchemePart::pattern)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One dot-separated token of a scheme template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeToken {
    /// A recognized calendar part.
    Part(SchemePart),
    /// Any other text. Only an error once the template is formatted against a date.
    Unrecognized(String),
}

impl SchemeToken {
    fn parse(token: &str) -> Self {
        SchemePart::from_pattern(token)
            .map(SchemeToken::Part)
            .unwrap_or_else(|| SchemeToken::Unrecognized(token.to_owned()))
    }

    fn part(&self) -> Result<&SchemePart, SchemeError> {
        match self {
            SchemeToken::Part(part) => Ok(part),
            SchemeToken::Unrecognized(token) => Err(SchemeError::UnrecognizedSchemeToken {
                token: token.clone(),
                expected: expected_patterns(),
            }),
        }
    }

    /// See [SchemePart::min_width]. Unrecognized tokens have a width of 1.
    pub fn min_width(&self) -> usize {
        match self {
            SchemeToken::Part(part) => part.min_width(),
            SchemeToken::Unrecognized(_) => 1,
        }
    }
}

impl Display for SchemeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeToken::Part(part) => write!(f, "{}", part),
            SchemeToken::Unrecognized(token) => f.write_str(token),
        }
    }
}

/// A dot-separated calendar scheme, like `YYYY.0M.DD`. It declares how many of the leading
/// release numbers of a version are date-derived, and how wide each of them is.
///
/// Constructing a template with [SchemeTemplate::new] never fails: unrecognized tokens are
/// kept, count as release slots of width 1, and only cause an error once the template is
/// formatted against a date. Use [str::parse] to reject them upfront.
///
/// ```
/// use calbump::{Date, SchemeTemplate};
///
/// let template = SchemeTemplate::new("YYYY.0M.DD");
/// let date = Date::explicit(2024, 9, 6).unwrap();
/// assert_eq!(vec!["2024", "09", "6"], template.format(&date).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeTemplate {
    tokens: Vec<SchemeToken>,
}

impl SchemeTemplate {
    /// Splits `template_str` on dots.
    pub fn new(template_str: &str) -> Self {
        Self {
            tokens: template_str.split('.').map(SchemeToken::parse).collect(),
        }
    }

    /// The tokens of this template, in order.
    pub fn tokens(&self) -> &[SchemeToken] {
        &self.tokens
    }

    /// The number of release slots this template covers.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false: splitting even an empty string yields one token.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The minimum width of each slot, in order.
    pub fn min_widths(&self) -> Vec<usize> {
        self.tokens.iter().map(SchemeToken::min_width).collect()
    }

    /// The numeric value of each slot for `date`.
    ///
    /// # Errors
    ///
    /// - [SchemeError::UnrecognizedSchemeToken] if any token is not a calendar part.
    /// - [SchemeError::NegativeYear] if a `YYYY` part can't represent the year of `date`.
    pub fn values(&self, date: &Date) -> Result<Vec<u64>, SchemeError> {
        self.tokens
            .iter()
            .map(|token| token.part()?.value(date))
            .collect()
    }

    /// Formats each slot for `date`.
    ///
    /// # Errors
    ///
    /// Same as [SchemeTemplate::values].
    pub fn format(&self, date: &Date) -> Result<Vec<String>, SchemeError> {
        let formatted = self
            .tokens
            .iter()
            .map(|token| {
                let part = token.part()?;
                Ok(part.format_value(part.value(date)?))
            })
            .collect::<Result<Vec<_>, SchemeError>>()?;
        tracing::trace!(template = %self, %date, ?formatted, "formatted scheme template");
        Ok(formatted)
    }
}

impl FromStr for SchemeTemplate {
    type Err = SchemeError;

    /// Like [SchemeTemplate::new], but fails on the first unrecognized token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let template = Self::new(s);
        for token in &template.tokens {
            token.part()?;
        }
        Ok(template)
    }
}

impl Display for SchemeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::*;

    #[fixture]
    fn date() -> Date {
        Date::explicit(2024, 9, 16).unwrap()
    }

    #[rstest]
    #[case("YYYY", "2024")]
    #[case("YY", "24")]
    #[case("0Y", "24")]
    #[case("MM", "9")]
    #[case("0M", "09")]
    #[case("WW", "38")]
    #[case("0W", "38")]
    #[case("DD", "16")]
    #[case("0D", "16")]
    fn test_format_each_part(date: Date, #[case] template_str: &str, #[case] expected: &str) {
        let template = SchemeTemplate::new(template_str);
        assert_eq!(Ok(vec![expected.to_string()]), template.format(&date));
    }

    #[rstest]
    #[case(Date::explicit(2005, 1, 2).unwrap(), "YY.0Y.MM.0M.DD.0D", "5.05.1.01.2.02")]
    #[case(Date::explicit(2100, 3, 4).unwrap(), "YY.0Y", "0.00")]
    // ISO weeks: 2021-01-03 still belongs to week 53 of 2020
    #[case(Date::explicit(2021, 1, 3).unwrap(), "WW.0W", "53.53")]
    #[case(Date::explicit(2024, 1, 1).unwrap(), "WW.0W", "1.01")]
    fn test_format_edges(#[case] date: Date, #[case] template_str: &str, #[case] expected: &str) {
        let template = SchemeTemplate::new(template_str);
        assert_eq!(expected, template.format(&date).unwrap().join("."));
    }

    /// Every combination of up to three parts formats back to the calendar fields of the date,
    /// with exactly the padding its part calls for.
    #[rstest]
    fn test_format_reparses_to_date(date: Date) {
        let patterns = SchemePart::ALL.iter().map(SchemePart::pattern).collect_vec();

        for len in 1..=3 {
            for combination in std::iter::repeat(patterns.iter())
                .take(len)
                .multi_cartesian_product()
            {
                let template_str = combination.iter().join(".");
                let template = SchemeTemplate::new(&template_str);
                let formatted = template.format(&date).unwrap();

                for (token, text) in template.tokens().iter().zip(&formatted) {
                    let SchemeToken::Part(part) = token else {
                        unreachable!("only recognized parts were combined");
                    };
                    let expected = match part {
                        SchemePart::Year(YearType::Full) => 2024,
                        SchemePart::Year(_) => 24,
                        SchemePart::Month(_) => 9,
                        SchemePart::Week(_) => 38,
                        SchemePart::Day(_) => 16,
                    };
                    assert_eq!(expected, text.parse::<u64>().unwrap());
                    if part.zero_pad_len().is_some() {
                        assert_eq!(2, text.len(), "{template_str}");
                    } else {
                        assert!(!text.starts_with('0'), "{template_str}");
                    }
                }
            }
        }
    }

    #[rstest]
    fn test_unrecognized_token(date: Date) {
        let template = SchemeTemplate::new("HEY.THERE");
        let err = template.format(&date).unwrap_err();
        assert_eq!(
            SchemeError::UnrecognizedSchemeToken {
                token: "HEY".to_string(),
                expected: "YYYY, YY, 0Y, MM, 0M, WW, 0W, DD, 0D".to_string(),
            },
            err
        );
        assert_eq!(
            "Unknown calver-scheme part: HEY (expected one of YYYY, YY, 0Y, MM, 0M, WW, 0W, DD, 0D)",
            err.to_string()
        );
    }

    #[test]
    fn test_negative_full_year() {
        let template = SchemeTemplate::new("YYYY");
        let date = Date::explicit(-1, 1, 1).unwrap();
        assert_eq!(
            Err(SchemeError::NegativeYear { year: -1 }),
            template.values(&date)
        );
    }

    #[rstest]
    #[case("YYYY.MM.DD", vec![4, 1, 1])]
    #[case("YY.0M.0D", vec![2, 2, 2])]
    #[case("0Y.0W", vec![2, 2])]
    #[case("YYYY.M.DD", vec![4, 1, 1])]
    fn test_min_widths(#[case] template_str: &str, #[case] expected: Vec<usize>) {
        assert_eq!(expected, SchemeTemplate::new(template_str).min_widths());
    }

    #[test]
    fn test_lenient_and_strict_parse() {
        let lenient = SchemeTemplate::new("YYYY.M.DD");
        assert_eq!(3, lenient.len());
        assert_eq!(
            SchemeToken::Unrecognized("M".to_string()),
            lenient.tokens()[1]
        );

        assert!(matches!(
            "YYYY.M.DD".parse::<SchemeTemplate>(),
            Err(SchemeError::UnrecognizedSchemeToken { token, .. }) if token == "M"
        ));
        assert!("YYYY.0M.0D".parse::<SchemeTemplate>().is_ok());
    }

    #[rstest]
    #[case("YYYY.0M.DD")]
    #[case("this won't matter")]
    fn test_display_round_trip(#[case] template_str: &str) {
        assert_eq!(template_str, SchemeTemplate::new(template_str).to_string());
    }
}
