//! ClientParser - pull name / age / location / work out of pasted text
//!
//! Each field has its own case-insensitive pattern anchored at a line start:
//! a label, then `:` or a spaced `-`, then the rest of the line. Labels may come in any
//! order and unrelated lines are ignored. All four fields must resolve.

use chrono::NaiveDate;
use opsdesk_domain::DailyAddedClient;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Optional bullet / indentation before a label
const LEAD: &str = r"^[ \t\-*•>]*";
/// Separator between label and value; a dash only counts after a space, so
/// hyphenated labels like "Work-place" are not split
const SEP: &str = r"(?:[ \t]*:|[ \t]+-)[ \t]*(.*)$";

fn field_pattern(labels: &str) -> Regex {
    Regex::new(&format!(r"(?im){LEAD}(?:{labels}){SEP}")).expect("static pattern is valid")
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| field_pattern(r"client[ \t]*name|name"));
static AGE_RE: LazyLock<Regex> = LazyLock::new(|| field_pattern(r"age"));
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| field_pattern(r"location|loc"));
static WORK_RE: LazyLock<Regex> = LazyLock::new(|| field_pattern(r"work|occupation"));

/// The four fields the parser looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Age,
    Location,
    Work,
}

impl ClientField {
    pub fn label(&self) -> &'static str {
        match self {
            ClientField::Name => "name",
            ClientField::Age => "age",
            ClientField::Location => "location",
            ClientField::Work => "work",
        }
    }
}

impl std::fmt::Display for ClientField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("could not find the client's {0}")]
    MissingField(ClientField),

    #[error("age '{0}' is not a number")]
    InvalidAge(String),
}

/// Fields extracted from one block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClientDetails {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub work: String,
}

impl ParsedClientDetails {
    /// Attach the assigning agent and the day the lead was added
    pub fn into_record(self, agent: impl Into<String>, date: NaiveDate) -> DailyAddedClient {
        DailyAddedClient {
            name: self.name,
            age: self.age,
            location: self.location,
            work: self.work,
            agent: agent.into(),
            date,
        }
    }
}

fn capture(re: &Regex, text: &str, field: ClientField) -> Result<String, ParseError> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ParseError::MissingField(field))
}

/// Leading digits of the age value, so "34 years" reads as 34
fn parse_age(raw: &str) -> Result<u32, ParseError> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidAge(raw.to_string()))
}

/// Parse a pasted block of client details
///
/// ```
/// let details = intake::parse_client_details(
///     "Work: Tailor\nName: Meera\nAge: 34\nLoc: Pune",
/// )
/// .unwrap();
/// assert_eq!(details.name, "Meera");
/// assert_eq!(details.age, 34);
/// ```
pub fn parse_client_details(text: &str) -> Result<ParsedClientDetails, ParseError> {
    let name = capture(&NAME_RE, text, ClientField::Name)?;
    let age_raw = capture(&AGE_RE, text, ClientField::Age)?;
    let location = capture(&LOCATION_RE, text, ClientField::Location)?;
    let work = capture(&WORK_RE, text, ClientField::Work)?;

    Ok(ParsedClientDetails {
        name,
        age: parse_age(&age_raw)?,
        location,
        work,
    })
}
