//! Version constraint resolution
//!
//! Matches the dependency version declared in `buildpack.toml` against the
//! range that detection recorded in the buildpack plan.
//!
//! Ranges use the npm-style grammar found in `package.json` `engines` fields:
//! `||` separates alternatives, whitespace (or commas) separate comparators
//! that must all hold, a bare full version is an exact match, bare partial
//! versions and `x`/`*` wildcards select a version family, and `A - B` is an
//! inclusive span. Comparators are parsed by the `semver` crate and lowered to
//! bounds that are checked by plain semver precedence, so a pre-release sorts
//! just below its release and otherwise behaves like any other version.

use crate::descriptor::ConstraintEntry;
use crate::error::{BuildpackError, BuildpackResult};
use semver::{BuildMetadata, Comparator, Op, Version};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Plan entry name that carries the Node.js constraint
pub const NODE_ENTRY: &str = "node";

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '~', '^'];

/// One side of an interval, compared by precedence
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    AtLeast(Version),
    Above(Version),
    AtMost(Version),
    Below(Version),
}

impl Bound {
    fn admits(&self, version: &Version) -> bool {
        match self {
            Bound::AtLeast(b) => version >= b,
            Bound::Above(b) => version > b,
            Bound::AtMost(b) => version <= b,
            Bound::Below(b) => version < b,
        }
    }
}

/// A parsed range expression: satisfied when any alternative is satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    source: String,
    alternatives: Vec<Vec<Bound>>,
}

impl VersionRange {
    /// Parse a range expression such as `14.x`, `>=14.0.0 <15` or `^12 || ^14`
    pub fn parse(expr: &str) -> BuildpackResult<Self> {
        let invalid = |reason: String| BuildpackError::InvalidRange {
            range: expr.to_string(),
            reason,
        };

        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty range".to_string()));
        }

        let alternatives = trimmed
            .split("||")
            .map(parse_alternative)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(Self {
            source: trimmed.to_string(),
            alternatives,
        })
    }

    /// Check whether a concrete version lies inside the range.
    ///
    /// Build metadata takes no part in precedence and is ignored.
    pub fn matches(&self, version: &Version) -> bool {
        let version = Version {
            build: BuildMetadata::EMPTY,
            ..version.clone()
        };
        self.alternatives
            .iter()
            .any(|bounds| bounds.iter().all(|bound| bound.admits(&version)))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for VersionRange {
    type Err = BuildpackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse one `||`-free alternative into the bounds that must all hold.
fn parse_alternative(alt: &str) -> Result<Vec<Bound>, String> {
    let tokens: Vec<&str> = alt
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err("empty comparator set".to_string());
    }

    let mut bounds = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        // Inclusive hyphen span: `A - B`
        if tokens.get(i + 1) == Some(&"-") {
            let upper = tokens
                .get(i + 2)
                .ok_or_else(|| format!("hyphen range '{} -' has no upper bound", tokens[i]))?;
            bounds.extend(lower(&comparator(">=", strip_v(tokens[i]))?)?);
            bounds.extend(lower(&comparator("<=", strip_v(upper))?)?);
            i += 3;
            continue;
        }

        let token = tokens[i];
        let (op, rest) = split_operator(token);
        let rest = if rest.is_empty() && !op.is_empty() {
            // Operator separated from its version by whitespace: `>= 14.0.0`
            i += 1;
            tokens
                .get(i)
                .copied()
                .ok_or_else(|| format!("operator '{op}' has no version"))?
        } else {
            rest
        };
        if let Some(c) = bare_or_operator(op, strip_v(rest))? {
            bounds.extend(lower(&c)?);
        }
        i += 1;
    }

    Ok(bounds)
}

/// Build a comparator for a token, or `None` for a match-anything wildcard.
fn bare_or_operator(op: &str, version: &str) -> Result<Option<Comparator>, String> {
    if !op.is_empty() {
        return comparator(op, version).map(Some);
    }
    if matches!(version, "*" | "x" | "X") {
        return Ok(None);
    }
    if Version::parse(version).is_ok() || !has_wildcard(version) {
        // A bare version selects exactly that version, or that family when
        // partial (`14.5` is `14.5.x`, not `^14.5`).
        return comparator("=", version).map(Some);
    }
    comparator("", version).map(Some)
}

fn comparator(op: &str, version: &str) -> Result<Comparator, String> {
    let text = format!("{op}{version}");
    Comparator::from_str(&text).map_err(|e| format!("'{text}': {e}"))
}

/// Lower a comparator to precedence bounds.
///
/// Missing minor/patch parts widen the comparator to the whole family:
/// `<=14` is `<15.0.0`, `>14.5` is `>=14.6.0`.
fn lower(c: &Comparator) -> Result<Vec<Bound>, String> {
    let floor = Version {
        major: c.major,
        minor: c.minor.unwrap_or(0),
        patch: c.patch.unwrap_or(0),
        pre: c.pre.clone(),
        build: BuildMetadata::EMPTY,
    };
    let partial = c.minor.is_none() || c.patch.is_none();
    let family_end = match (c.minor, c.patch) {
        (None, _) => Version::new(c.major + 1, 0, 0),
        (Some(minor), None) => Version::new(c.major, minor + 1, 0),
        (Some(minor), Some(patch)) => Version::new(c.major, minor, patch + 1),
    };

    let bounds = match c.op {
        Op::Exact | Op::Wildcard if partial => {
            vec![Bound::AtLeast(floor), Bound::Below(family_end)]
        }
        Op::Exact | Op::Wildcard => vec![Bound::AtLeast(floor.clone()), Bound::AtMost(floor)],
        Op::Greater if partial => vec![Bound::AtLeast(family_end)],
        Op::Greater => vec![Bound::Above(floor)],
        Op::GreaterEq => vec![Bound::AtLeast(floor)],
        Op::Less => vec![Bound::Below(floor)],
        Op::LessEq if partial => vec![Bound::Below(family_end)],
        Op::LessEq => vec![Bound::AtMost(floor)],
        Op::Tilde => {
            let end = match c.minor {
                Some(minor) => Version::new(c.major, minor + 1, 0),
                None => Version::new(c.major + 1, 0, 0),
            };
            vec![Bound::AtLeast(floor), Bound::Below(end)]
        }
        Op::Caret => {
            let end = match (c.major, c.minor, c.patch) {
                (major, _, _) if major > 0 => Version::new(major + 1, 0, 0),
                (_, None, _) => Version::new(1, 0, 0),
                (_, Some(minor), _) if minor > 0 => Version::new(0, minor + 1, 0),
                (_, Some(_), None) => Version::new(0, 1, 0),
                (_, Some(_), Some(patch)) => Version::new(0, 0, patch + 1),
            };
            vec![Bound::AtLeast(floor), Bound::Below(end)]
        }
        _ => return Err(format!("unsupported comparator '{c}'")),
    };
    Ok(bounds)
}

fn split_operator(token: &str) -> (&str, &str) {
    let end = token
        .find(|c: char| !OPERATOR_CHARS.contains(&c))
        .unwrap_or(token.len());
    token.split_at(end)
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn has_wildcard(version: &str) -> bool {
    version
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

/// Outcome of matching the declared version against the plan
#[derive(Debug, Clone)]
pub struct Resolution {
    pub range: VersionRange,
    pub version: Version,
    pub satisfied: bool,
}

impl Resolution {
    /// Locate the `node` plan entry and evaluate it against `declared`.
    ///
    /// The range is parsed before the declared version, so a plan with a
    /// malformed range reports that first.
    pub fn evaluate(entries: &[ConstraintEntry], declared: &str) -> BuildpackResult<Self> {
        let entry = entries
            .iter()
            .find(|e| e.name == NODE_ENTRY)
            .ok_or_else(|| BuildpackError::ConstraintNotFound {
                name: NODE_ENTRY.to_string(),
            })?;

        let range = VersionRange::parse(&entry.version)?;
        let version = Version::parse(declared.trim()).map_err(|e| BuildpackError::InvalidVersion {
            version: declared.to_string(),
            reason: e.to_string(),
        })?;
        let satisfied = range.matches(&version);

        debug!(range = %range, version = %version, satisfied, "resolved version constraint");
        Ok(Self {
            range,
            version,
            satisfied,
        })
    }

    /// Turn a negative result into `VersionMismatch`
    pub fn require(self) -> BuildpackResult<Version> {
        if self.satisfied {
            Ok(self.version)
        } else {
            Err(BuildpackError::VersionMismatch {
                version: self.version.to_string(),
                range: self.range.to_string(),
            })
        }
    }
}

/// Check whether the declared version satisfies the plan's `node` constraint
pub fn resolve(entries: &[ConstraintEntry], declared: &str) -> BuildpackResult<bool> {
    Resolution::evaluate(entries, declared).map(|r| r.satisfied)
}
