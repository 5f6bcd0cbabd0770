// Copyright (C) 2025 Joseph Sacchini
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Semantic-version comparison expressions (`<`, `<=`, `=`, `>`, `>=`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("{0:?} is not a valid comparison operator")]
    InvalidOperator(String),

    #[error("{input:?} is not a valid semantic version: {source}")]
    Parse {
        input: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Eq,
    Gt,
    Ge,
}

impl Operator {
    /// Whether a three-way comparison result satisfies this operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        use Ordering::*;
        match self {
            Self::Lt => ordering == Less,
            Self::Le => matches!(ordering, Less | Equal),
            Self::Eq => ordering == Equal,
            Self::Gt => ordering == Greater,
            Self::Ge => matches!(ordering, Equal | Greater),
        }
    }
}

impl FromStr for Operator {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(VersionError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

/// Parse a version, dropping build metadata since it carries no precedence.
pub fn parse(input: &str) -> Result<Version, VersionError> {
    let mut version = Version::parse(input).map_err(|source| VersionError::Parse {
        input: input.to_string(),
        source,
    })?;
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}

/// Evaluate `a <op> b`. The operator is checked before either version is parsed.
pub fn compare(op: &str, a: &str, b: &str) -> Result<bool, VersionError> {
    let op: Operator = op.parse()?;
    Ok(op.accepts(parse(a)?.cmp(&parse(b)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(">", "1.2.3", "1.2.0", true ; "gt true")]
    #[test_case(">", "1.2.0", "1.2.0", false ; "gt equal")]
    #[test_case(">=", "1.2.0", "1.2.0", true ; "ge equal")]
    #[test_case(">=", "1.1.9", "1.2.0", false ; "ge less")]
    #[test_case("<", "1.9.0", "1.10.0", true ; "lt numeric not lexical")]
    #[test_case("<", "1.0.0", "1.0.0", false ; "lt equal")]
    #[test_case("<=", "1.0.0", "1.0.0", true ; "le equal")]
    #[test_case("<=", "2.0.0", "1.0.0", false ; "le greater")]
    #[test_case("=", "1.0.0", "1.0.0", true ; "eq true")]
    #[test_case("=", "1.0.0", "1.0.1", false ; "eq false")]
    #[test_case("<", "1.0.0-alpha", "1.0.0", true ; "prerelease sorts first")]
    #[test_case("=", "1.0.0+build.1", "1.0.0+build.2", true ; "build metadata ignored")]
    fn compare_matches_semver_ordering(op: &str, a: &str, b: &str, expected: bool) {
        assert_eq!(compare(op, a, b).unwrap(), expected);
    }

    #[test_case("==" ; "double equals")]
    #[test_case("!=" ; "not equal")]
    #[test_case("" ; "empty")]
    #[test_case("gt" ; "word")]
    fn unknown_operator_is_rejected(op: &str) {
        assert!(matches!(
            compare(op, "1.0.0", "1.0.0"),
            Err(VersionError::InvalidOperator(_))
        ));
    }

    #[test]
    fn operator_checked_before_versions() {
        assert!(matches!(
            compare("~", "garbage", "also garbage"),
            Err(VersionError::InvalidOperator(_))
        ));
    }

    #[test_case("1.2" ; "missing patch")]
    #[test_case("v1.2.3" ; "prefixed")]
    #[test_case("latest" ; "word")]
    fn unparsable_version_is_error(version: &str) {
        assert!(matches!(
            compare("=", version, "1.2.3"),
            Err(VersionError::Parse { .. })
        ));
        assert!(matches!(
            compare("=", "1.2.3", version),
            Err(VersionError::Parse { .. })
        ));
    }

    #[test]
    fn operator_round_trips_through_display() {
        for op in ["<", "<=", "=", ">", ">="] {
            assert_eq!(op.parse::<Operator>().unwrap().to_string(), op);
        }
    }
}
