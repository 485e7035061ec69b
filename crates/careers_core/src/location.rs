use std::sync::LazyLock;

use regex::Regex;

/// Country assigned to titles whose trailing location part is a two-letter code.
const US_COUNTRY: &str = "USA";

/// `(City[, State], Country[; City2, Country2 ...])`. Alternates are matched but ignored.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\(((?P<city>[\w\s]+)(, (?P<state>[\w\s]+))?, (?P<country>[\w\s]+))(; [\w\s]+, [\w\s]+)*\)",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocation {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("no location clause in title {0:?}")]
    NoLocation(String),
}

/// Extract the location from the first parenthesized clause of a job title.
///
/// A two-letter country is read as a US state code: it moves to `state` and
/// the country becomes `"USA"`.
pub fn parse_location(title: &str) -> Result<ParsedLocation, LocationError> {
    let caps = LOCATION_RE
        .captures(title)
        .ok_or_else(|| LocationError::NoLocation(title.to_string()))?;

    // Both groups are mandatory in the pattern.
    let city = caps["city"].to_string();
    let country = caps["country"].to_string();
    let state = caps.name("state").map(|m| m.as_str().to_string());

    if country.chars().count() == 2 {
        return Ok(ParsedLocation {
            city,
            state: Some(country),
            country: US_COUNTRY.to_string(),
        });
    }

    Ok(ParsedLocation {
        city,
        state,
        country,
    })
}
