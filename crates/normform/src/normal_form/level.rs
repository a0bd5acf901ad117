//! The ordered ladder of normal forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// A level on the normal-form ladder, ordered `UNF < 1NF < ... < 5NF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "UNF")]
    Unnormalized,
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
    #[serde(rename = "BCNF")]
    BoyceCodd,
    #[serde(rename = "4NF")]
    Fourth,
    #[serde(rename = "5NF")]
    Fifth,
}

impl NormalForm {
    /// Every level, lowest first.
    pub const ALL: [NormalForm; 7] = [
        NormalForm::Unnormalized,
        NormalForm::First,
        NormalForm::Second,
        NormalForm::Third,
        NormalForm::BoyceCodd,
        NormalForm::Fourth,
        NormalForm::Fifth,
    ];

    /// Position on the ladder (UNF = 0).
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Level at a ladder position.
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(usize::from(rank)).copied()
    }

    /// The next stricter level, or `None` at 5NF.
    pub fn next(self) -> Option<Self> {
        Self::from_rank(self.rank() + 1)
    }

    /// The next weaker level, or `None` at UNF.
    pub fn previous(self) -> Option<Self> {
        self.rank().checked_sub(1).and_then(Self::from_rank)
    }

    /// Canonical label (`UNF`, `1NF`, ..., `BCNF`, ..., `5NF`).
    pub fn label(self) -> &'static str {
        match self {
            NormalForm::Unnormalized => "UNF",
            NormalForm::First => "1NF",
            NormalForm::Second => "2NF",
            NormalForm::Third => "3NF",
            NormalForm::BoyceCodd => "BCNF",
            NormalForm::Fourth => "4NF",
            NormalForm::Fifth => "5NF",
        }
    }

    /// Levels strictly above `self` up to and including `target`.
    pub fn steps_to(self, target: NormalForm) -> impl Iterator<Item = NormalForm> {
        Self::ALL
            .into_iter()
            .filter(move |level| *level > self && *level <= target)
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NormalForm {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(token))
            .ok_or_else(|| NormalizeError::InvalidNormalFormLabel(s.to_string()))
    }
}

/// A caller's statement of the current level: a known level, or `auto` to
/// classify first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NormalFormRequest {
    #[default]
    Auto,
    Level(NormalForm),
}

impl NormalFormRequest {
    /// The stated level, if any.
    pub fn level(self) -> Option<NormalForm> {
        match self {
            NormalFormRequest::Auto => None,
            NormalFormRequest::Level(level) => Some(level),
        }
    }
}

impl fmt::Display for NormalFormRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalFormRequest::Auto => f.write_str("auto"),
            NormalFormRequest::Level(level) => level.fmt(f),
        }
    }
}

impl FromStr for NormalFormRequest {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(NormalFormRequest::Auto)
        } else {
            s.parse().map(NormalFormRequest::Level)
        }
    }
}

impl TryFrom<String> for NormalFormRequest {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NormalFormRequest> for String {
    fn from(request: NormalFormRequest) -> Self {
        request.to_string()
    }
}

impl From<NormalForm> for NormalFormRequest {
    fn from(level: NormalForm) -> Self {
        NormalFormRequest::Level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_rank() {
        assert!(NormalForm::Unnormalized < NormalForm::First);
        assert!(NormalForm::Third < NormalForm::BoyceCodd);
        assert!(NormalForm::BoyceCodd < NormalForm::Fourth);
        assert_eq!(NormalForm::BoyceCodd.rank(), 4);
        assert_eq!(NormalForm::from_rank(6), Some(NormalForm::Fifth));
        assert_eq!(NormalForm::from_rank(7), None);
    }

    #[test]
    fn test_next_and_previous() {
        assert_eq!(NormalForm::Third.next(), Some(NormalForm::BoyceCodd));
        assert_eq!(NormalForm::Fifth.next(), None);
        assert_eq!(NormalForm::Unnormalized.previous(), None);
        assert_eq!(NormalForm::First.previous(), Some(NormalForm::Unnormalized));
    }

    #[test]
    fn test_labels_round_trip() {
        for level in NormalForm::ALL {
            assert_eq!(level.label().parse::<NormalForm>().unwrap(), level);
        }
        assert_eq!("bcnf".parse::<NormalForm>().unwrap(), NormalForm::BoyceCodd);
    }

    #[test]
    fn test_invalid_label() {
        let err = "6NF".parse::<NormalForm>().unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidNormalFormLabel(label) if label == "6NF"));
    }

    #[test]
    fn test_steps_to() {
        let steps: Vec<_> = NormalForm::First.steps_to(NormalForm::BoyceCodd).collect();
        assert_eq!(
            steps,
            vec![NormalForm::Second, NormalForm::Third, NormalForm::BoyceCodd]
        );
        assert_eq!(NormalForm::Fourth.steps_to(NormalForm::Second).count(), 0);
    }

    #[test]
    fn test_request_parsing() {
        assert_eq!("auto".parse::<NormalFormRequest>().unwrap(), NormalFormRequest::Auto);
        assert_eq!(
            "3NF".parse::<NormalFormRequest>().unwrap(),
            NormalFormRequest::Level(NormalForm::Third)
        );
        assert!("later".parse::<NormalFormRequest>().is_err());
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&NormalForm::BoyceCodd).unwrap();
        assert_eq!(json, "\"BCNF\"");
        let request: NormalFormRequest = serde_json::from_str("\"AUTO\"").unwrap();
        assert_eq!(request, NormalFormRequest::Auto);
    }
}
