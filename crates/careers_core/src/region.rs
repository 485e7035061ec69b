use std::collections::BTreeSet;

/// Country names accepted by the default filter.
pub const EUROPE: &[&str] = &[
    "Austria",
    "Belgium",
    "Denmark",
    "Deutschland",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Ireland",
    "Italy",
    "Nederlands",
    "Norway",
    "Poland",
    "Portugal",
    "Spain",
    "Sweden",
    "Switzerland",
    "Ukraine",
    "United Kingdom",
];

/// Allow-list of country names. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    countries: BTreeSet<String>,
}

impl Region {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn europe() -> Self {
        Self::new(EUROPE.iter().copied())
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains(country)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::europe()
    }
}
