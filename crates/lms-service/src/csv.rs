//! Trainee roster import from CSV.

use std::collections::HashMap;

use lms_core::NOT_AVAILABLE;
use serde::Serialize;

/// One trainee parsed from an uploaded roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// Trainee name.
    pub name: String,
    /// Mobile number, or `N/A`.
    pub mobile: String,
    /// Email, or `N/A`.
    pub email: String,
}

struct Columns {
    name: usize,
    mobile: usize,
    email: usize,
}

impl Columns {
    const POSITIONAL: Self = Self {
        name: 0,
        mobile: 1,
        email: 2,
    };

    /// Column positions from a header line, if it names a `name` column.
    fn from_header(fields: &[String]) -> Option<Self> {
        let idx: HashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.trim().to_ascii_lowercase(), i))
            .collect();

        let name = idx.get("name").copied()?;
        Some(Self {
            name,
            mobile: idx
                .get("mobile")
                .or_else(|| idx.get("phone"))
                .copied()
                .unwrap_or(usize::MAX),
            email: idx.get("email").copied().unwrap_or(usize::MAX),
        })
    }
}

/// Parse a roster.
///
/// When the first record has a `name` column it is read as a header, with
/// `mobile` (or `phone`) and `email` looked up by name. Otherwise every
/// record is data in `name, mobile, email` order. Records without a name
/// are skipped; missing contact details become `N/A`.
#[must_use]
pub fn parse_roster(text: &str) -> Vec<RosterEntry> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_csv_records(text)
        .into_iter()
        .filter(|fields| fields.iter().any(|f| !f.trim().is_empty()))
        .peekable();

    let columns = match records.peek() {
        Some(first) => match Columns::from_header(first) {
            Some(columns) => {
                records.next();
                columns
            }
            None => Columns::POSITIONAL,
        },
        None => return Vec::new(),
    };

    records
        .filter_map(|fields| {
            let field = |i: usize| fields.get(i).map(|s| s.trim()).filter(|s| !s.is_empty());

            let name = field(columns.name)?.to_string();
            Some(RosterEntry {
                name,
                mobile: field(columns.mobile).unwrap_or(NOT_AVAILABLE).to_string(),
                email: field(columns.email).unwrap_or(NOT_AVAILABLE).to_string(),
            })
        })
        .collect()
}

/// Split CSV text into records of fields, honoring double quotes and `""`
/// escapes. Line breaks inside quotes belong to the field; outside quotes
/// `\n` and `\r\n` end the record.
fn parse_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                buf.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut buf)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut buf));
                records.push(std::mem::take(&mut fields));
            }
            _ => buf.push(ch),
        }
    }
    if !buf.is_empty() || !fields.is_empty() {
        fields.push(buf);
        records.push(fields);
    }
    records
}
