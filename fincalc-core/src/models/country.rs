use std::fmt;

use serde::{Deserialize, Serialize};

/// Jurisdictions with a tax profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    India,
    Canada,
    UnitedStates,
}

impl Country {
    pub fn all() -> &'static [Country] {
        &[Country::India, Country::Canada, Country::UnitedStates]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "IN",
            Self::Canada => "CA",
            Self::UnitedStates => "US",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Canada => "Canada",
            Self::UnitedStates => "United States",
        }
    }

    /// Accepts the two-letter code or the display name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all().iter().copied().find(|country| {
            s.eq_ignore_ascii_case(country.as_str())
                || s.eq_ignore_ascii_case(country.display_name())
        })
        .or_else(|| match s.to_ascii_uppercase().as_str() {
            "USA" | "UNITEDSTATES" => Some(Self::UnitedStates),
            _ => None,
        })
    }
}

impl fmt::Display for Country {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
