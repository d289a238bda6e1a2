use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::taxonomy::TaxonomyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Other => "other",
        }
    }
}

impl FromStr for Sex {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "female" | "f" | "woman" => Ok(Self::Female),
            "male" | "m" | "man" => Ok(Self::Male),
            "other" | "unspecified" => Ok(Self::Other),
            _ => Err(TaxonomyError::Unmapped { dimension: "sex", label: value.to_string() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Teen,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeBracket {
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=19 => Self::Teen,
            20..=34 => Self::YoungAdult,
            35..=59 => Self::Adult,
            _ => Self::Senior,
        }
    }

    /// Shift applied to a style's bold-color tolerance.
    pub fn bold_color_shift(self) -> f64 {
        match self {
            Self::Teen => 0.2,
            Self::YoungAdult => 0.1,
            Self::Adult => 0.0,
            Self::Senior => -0.2,
        }
    }
}

/// Demographic half of the user profile; the preferred style arrives with
/// each recommendation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u8,
    pub sex: Sex,
}

impl UserProfile {
    pub fn age_bracket(&self) -> AgeBracket {
        AgeBracket::from_age(self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_brackets_cover_boundaries() {
        assert_eq!(AgeBracket::from_age(19), AgeBracket::Teen);
        assert_eq!(AgeBracket::from_age(20), AgeBracket::YoungAdult);
        assert_eq!(AgeBracket::from_age(35), AgeBracket::Adult);
        assert_eq!(AgeBracket::from_age(60), AgeBracket::Senior);
    }

    #[test]
    fn sex_parses_common_spellings() {
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
        assert_eq!(" male ".parse::<Sex>(), Ok(Sex::Male));
        assert!("unknown".parse::<Sex>().is_err());
    }
}
