use crate::error::ParseVersionError;
use core::{
    cmp::Ordering,
    fmt::{self, Display},
    str::FromStr,
};
use regex::Regex;
use std::sync::LazyLock;

/// The canonical PEP 440 pattern, as published in the PEP's appendix.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        v?
        (?:
            (?:(?P<epoch>[0-9]+)!)?                           # epoch
            (?P<release>[0-9]+(?:\.[0-9]+)*)                  # release segment
            (?P<pre>                                          # pre-release
                [-_\.]?
                (?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)
                [-_\.]?
                (?P<pre_n>[0-9]+)?
            )?
            (?P<post>                                         # post release
                (?:-(?P<post_n1>[0-9]+))
                |
                (?:
                    [-_\.]?
                    (?P<post_l>post|rev|r)
                    [-_\.]?
                    (?P<post_n2>[0-9]+)?
                )
            )?
            (?P<dev>                                          # dev release
                [-_\.]?
                (?P<dev_l>dev)
                [-_\.]?
                (?P<dev_n>[0-9]+)?
            )?
        )
        (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?       # local version
        \s*$",
    )
    .expect("PEP 440 pattern should compile")
});

/// The phase of a pre-release. Phases are ordered `a` < `b` < `rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrePhase {
    /// `a`, spelled `a` or `alpha`.
    Alpha,
    /// `b`, spelled `b` or `beta`.
    Beta,
    /// `rc`, spelled `rc`, `c`, `pre` or `preview`.
    ReleaseCandidate,
}

impl PrePhase {
    /// The normalized spelling of this phase.
    pub fn letter(&self) -> &'static str {
        match self {
            PrePhase::Alpha => "a",
            PrePhase::Beta => "b",
            PrePhase::ReleaseCandidate => "rc",
        }
    }
}

impl Display for PrePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// What a qualifier letter of a version normalizes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// A pre-release of the given phase.
    Pre(PrePhase),
    /// A post-release.
    Post,
    /// A development release.
    Dev,
}

/// Normalizes an alternate spelling of a qualifier letter, ignoring case. Returns `None` for
/// anything that isn't a PEP 440 qualifier.
///
/// ```
/// use calbump::{normalize_letter, PrePhase, Qualifier};
///
/// assert_eq!(Some(Qualifier::Pre(PrePhase::ReleaseCandidate)), normalize_letter("preview"));
/// assert_eq!(Some(Qualifier::Post), normalize_letter("REV"));
/// assert_eq!(None, normalize_letter("gamma"));
/// ```
pub fn normalize_letter(letter: &str) -> Option<Qualifier> {
    let qualifier = match letter.to_ascii_lowercase().as_str() {
        "a" | "alpha" => Qualifier::Pre(PrePhase::Alpha),
        "b" | "beta" => Qualifier::Pre(PrePhase::Beta),
        "rc" | "c" | "pre" | "preview" => Qualifier::Pre(PrePhase::ReleaseCandidate),
        "post" | "rev" | "r" => Qualifier::Post,
        "dev" => Qualifier::Dev,
        _ => return None,
    };
    Some(qualifier)
}

/// A pre-release marker, like the `rc2` of `1.0rc2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreRelease {
    /// The phase.
    pub phase: PrePhase,
    /// The number within the phase.
    pub number: u64,
}

impl PreRelease {
    /// Returns a new pre-release marker.
    pub fn new(phase: PrePhase, number: u64) -> Self {
        Self { phase, number }
    }
}

impl Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.phase, self.number)
    }
}

/// One dot-separated part of a local version label.
///
/// Numeric parts compare numerically and sort above any alphanumeric part, which compare
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalSegment {
    /// A part that only has letters and digits, lower-cased.
    Text(String),
    /// A part that is entirely digits.
    Number(u64),
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        use LocalSegment::*;
        match (self, other) {
            (Number(a), Number(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Number(_), Text(_)) => Ordering::Greater,
            (Text(_), Number(_)) => Ordering::Less,
        }
    }
}

impl Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(text) => f.write_str(text),
            LocalSegment::Number(number) => write!(f, "{}", number),
        }
    }
}

/// A PEP 440 version: `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`.
///
/// Versions are parsed leniently (alternate spellings and separators are accepted) and
/// always displayed in their normalized form. Equality and ordering follow PEP 440, so
/// `1.0 == 1.0.0` and `1.0.dev0 < 1.0a0 < 1.0 < 1.0.post0`.
///
/// A version value is never mutated. Use [Version::updated] to derive a new one.
///
/// # Examples
///
/// ```
/// use calbump::Version;
///
/// let version: Version = "2024.09.16-RC.1".parse().unwrap();
/// assert_eq!("2024.9.16rc1", version.to_string());
/// assert!(version < "2024.9.16".parse().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

/// A partial update of a [Version], applied with [Version::updated].
///
/// Parts of a version are ordered `release` < `pre` < `post` < `dev` < `local`. Setting a part
/// clears every later part that is not set in the same update, so a new pre-release drops
/// any post, dev and local parts, but keeps the release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionUpdate {
    release: Option<Vec<u64>>,
    pre: Option<Option<PreRelease>>,
    post: Option<Option<u64>>,
    dev: Option<Option<u64>>,
    local: Option<Option<Vec<LocalSegment>>>,
}

impl VersionUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the release numbers.
    pub fn release(mut self, release: Vec<u64>) -> Self {
        self.release = Some(release);
        self
    }

    /// Sets (or, with `None`, removes) the pre-release.
    pub fn pre(mut self, pre: Option<PreRelease>) -> Self {
        self.pre = Some(pre);
        self
    }

    /// Sets (or, with `None`, removes) the post-release number.
    pub fn post(mut self, post: Option<u64>) -> Self {
        self.post = Some(post);
        self
    }

    /// Sets (or, with `None`, removes) the dev-release number.
    pub fn dev(mut self, dev: Option<u64>) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Sets (or, with `None`, removes) the local label.
    pub fn local(mut self, local: Option<Vec<LocalSegment>>) -> Self {
        self.local = Some(local);
        self
    }
}

/// Picks the new value of one part: the update's value if it sets one, cleared if an earlier
/// part was set, else the current value. Flips `set` once a part is set.
fn next_part<T: Clone>(update: Option<T>, current: &T, cleared: T, set: &mut bool) -> T {
    match update {
        Some(value) => {
            *set = true;
            value
        }
        None if *set => cleared,
        None => current.clone(),
    }
}

fn parse_number(digits: &str, version_str: &str) -> Result<u64, ParseVersionError> {
    digits
        .parse()
        .map_err(|_| ParseVersionError::InvalidVersion {
            version: version_str.to_owned(),
        })
}

fn parse_local(local: &str) -> Vec<LocalSegment> {
    local
        .split(['.', '-', '_'])
        .map(|part| match part.parse() {
            Ok(number) if part.bytes().all(|b| b.is_ascii_digit()) => LocalSegment::Number(number),
            _ => LocalSegment::Text(part.to_ascii_lowercase()),
        })
        .collect()
}

impl Version {
    /// Returns a new version with the given release numbers and nothing else.
    pub fn new(release: impl Into<Vec<u64>>) -> Self {
        Self {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Parses a version string. Same as [str::parse].
    ///
    /// # Errors
    ///
    /// Returns [ParseVersionError::InvalidVersion] if `version_str` is not a PEP 440 version.
    pub fn parse(version_str: &str) -> Result<Self, ParseVersionError> {
        version_str.parse()
    }

    /// The epoch, `0` unless given.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The release numbers, like `[2024, 9, 16]` for `2024.09.16`.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The pre-release marker, if any.
    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    /// The post-release number, if any.
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// The dev-release number, if any.
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// The parts of the local label, if any.
    pub fn local(&self) -> Option<&[LocalSegment]> {
        self.local.as_deref()
    }

    /// Whether this is a pre-release or a dev release.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns a copy of this version with `update` applied. See [VersionUpdate] for which parts
    /// get cleared.
    ///
    /// ```
    /// use calbump::{PrePhase, PreRelease, Version, VersionUpdate};
    ///
    /// let version: Version = "2024.9.16.post3.dev1".parse().unwrap();
    /// let updated = version.updated(VersionUpdate::new().pre(Some(PreRelease::new(PrePhase::Beta, 0))));
    /// assert_eq!("2024.9.16b0", updated.to_string());
    /// ```
    pub fn updated(&self, update: VersionUpdate) -> Self {
        let mut set = false;
        let release = next_part(update.release, &self.release, Vec::new(), &mut set);
        let pre = next_part(update.pre, &self.pre, None, &mut set);
        let post = next_part(update.post, &self.post, None, &mut set);
        let dev = next_part(update.dev, &self.dev, None, &mut set);
        let local = next_part(update.local, &self.local, None, &mut set);
        Self {
            epoch: self.epoch,
            release,
            pre,
            post,
            dev,
            local,
        }
    }

    /// Renders this version with release numbers zero-padded to at least `widths[i]`
    /// characters. Release numbers without a width are not padded.
    ///
    /// ```
    /// use calbump::Version;
    ///
    /// let version: Version = "2024.09.06.1".parse().unwrap();
    /// assert_eq!("2024.9.6.1", version.to_string());
    /// assert_eq!("2024.09.06.1", version.to_padded_string(&[4, 2, 2]));
    /// ```
    pub fn to_padded_string(&self, widths: &[usize]) -> String {
        let mut rendered = String::new();
        // writing to a String doesn't fail
        let _ = self.write_padded(&mut rendered, widths);
        rendered
    }

    fn write_padded(&self, f: &mut impl fmt::Write, widths: &[usize]) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        for (idx, number) in self.release.iter().enumerate() {
            if idx > 0 {
                f.write_char('.')?;
            }
            let width = widths.get(idx).copied().unwrap_or(1);
            write!(f, "{:0width$}", number, width = width)?;
        }
        if let Some(pre) = &self.pre {
            write!(f, "{}", pre)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            f.write_char('+')?;
            for (idx, segment) in local.iter().enumerate() {
                if idx > 0 {
                    f.write_char('.')?;
                }
                write!(f, "{}", segment)?;
            }
        }
        Ok(())
    }

    /// The release numbers without trailing zeros. `1.0` and `1.0.0` compare equal.
    fn release_key(&self) -> &[u64] {
        let len = self
            .release
            .iter()
            .rposition(|number| *number != 0)
            .map_or(0, |idx| idx + 1);
        &self.release[..len]
    }

    /// A dev release without a pre or post release sorts before any pre-release of the same
    /// release. Otherwise, no pre-release sorts after all of them.
    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::BeforeAll,
            (None, _, _) => PreKey::AfterAll,
            (Some(pre), _, _) => PreKey::Pre(pre),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    BeforeAll,
    Pre(PreRelease),
    AfterAll,
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| ParseVersionError::InvalidVersion {
                version: s.to_owned(),
            })?;
        let number = |name: &str| {
            caps.name(name)
                .map(|m| parse_number(m.as_str(), s))
                .transpose()
        };

        let epoch = number("epoch")?.unwrap_or(0);
        let release = caps["release"]
            .split('.')
            .map(|digits| parse_number(digits, s))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l").and_then(|l| normalize_letter(l.as_str())) {
            Some(Qualifier::Pre(phase)) => {
                Some(PreRelease::new(phase, number("pre_n")?.unwrap_or(0)))
            }
            _ => None,
        };

        // `1.0-1` is an implicit post release
        let post = match number("post_n1")? {
            Some(post) => Some(post),
            None if caps.name("post_l").is_some() => Some(number("post_n2")?.unwrap_or(0)),
            None => None,
        };

        let dev = match caps.name("dev_l") {
            Some(_) => Some(number("dev_n")?.unwrap_or(0)),
            None => None,
        };

        let local = caps.name("local").map(|m| parse_local(m.as_str()));

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl Display for Version {
    /// Returns the normalized version string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_padded(f, &[])
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Orders versions by epoch, release, pre, post, dev and local parts, in that order.
    ///
    /// - A missing post release sorts before any post release.
    /// - A missing dev release sorts after any dev release.
    /// - A missing local label sorts before any local label.
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release_key().cmp(other.release_key()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| {
                (self.dev.is_none(), self.dev).cmp(&(other.dev.is_none(), other.dev))
            })
            .then_with(|| self.local.cmp(&other.local))
    }
}
