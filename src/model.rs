//! Typed records and per-kind decoding
//!
//! Documents are decoded by explicit field extraction from the generic
//! JSON value tree. A present field of the wrong shape is a hard error
//! carrying the field name and raw value; nothing is silently defaulted
//! except an absent `format`, which is in-person.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::Kind;
use crate::error::{LoadError, Result};

/// A venue where events take place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub region: String,
    pub postal_code: String,
    pub locality: String,
    pub address: String,
}

/// An entity that runs events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organizer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// How an event is attended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventFormat {
    #[default]
    InPerson,
    Hybrid,
    Virtual,
}

impl EventFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "in-person" => Ok(EventFormat::InPerson),
            "hybrid" => Ok(EventFormat::Hybrid),
            "virtual" => Ok(EventFormat::Virtual),
            _ => Err(LoadError::InvalidEnum {
                field: "format",
                value: value.to_string(),
            }),
        }
    }
}

/// Call-for-papers submission window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CfpWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// A single event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: Kind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    /// Foreign key into the organizers collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub format: EventFormat,
    /// Foreign key into the locations collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfp: Option<CfpWindow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

/// Decode a location document
pub fn decode_location(body: &Value) -> Result<Location> {
    let doc = as_mapping(body)?;
    Ok(Location {
        name: required_str(doc, "name")?,
        country: required_str(doc, "country")?,
        region: required_str(doc, "region")?,
        postal_code: required_str(doc, "postalCode")?,
        locality: required_str(doc, "locality")?,
        address: required_str(doc, "address")?,
    })
}

/// Decode an organizer document
pub fn decode_organizer(body: &Value) -> Result<Organizer> {
    let doc = as_mapping(body)?;
    Ok(Organizer {
        name: required_str(doc, "name")?,
        url: optional_str(doc, "url")?,
    })
}

/// Decode an event document
pub fn decode_event(body: &Value) -> Result<Event> {
    let doc = as_mapping(body)?;

    let name = required_str(doc, "name")?;
    let url = required_str(doc, "url")?;
    let description = optional_str(doc, "description")?;
    let organizer = optional_str(doc, "organizer")?;

    let start = {
        let date = required_str(doc, "startDate")?;
        let time = optional_str(doc, "startTime")?;
        parse_timestamp(&date, time.as_deref())?
    };
    let end = {
        let date = required_str(doc, "endDate")?;
        let time = optional_str(doc, "endTime")?;
        parse_timestamp(&date, time.as_deref())?
    };

    let format = match optional_str(doc, "format")? {
        Some(value) => EventFormat::parse(&value)?,
        None => EventFormat::default(),
    };

    let location = optional_str(doc, "location")?;
    let cfp = decode_cfp(doc)?;
    let topics = optional_str_list(doc, "topics")?;

    Ok(Event {
        kind: Kind::Event,
        name,
        description,
        url,
        organizer,
        start,
        end,
        format,
        location,
        cfp,
        topics,
    })
}

fn decode_cfp(doc: &Map<String, Value>) -> Result<Option<CfpWindow>> {
    let cfp = match doc.get("cfp") {
        None => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(LoadError::FieldType {
                field: "cfp",
                expected: "mapping",
                value: other.to_string(),
            })
        }
    };

    Ok(Some(CfpWindow {
        url: optional_str(cfp, "url")?,
        from: optional_date(cfp, "from")?,
        to: optional_date(cfp, "to")?,
    }))
}

/// Parse a date, combined with an offset-carrying time when present
///
/// `2025-09-10` alone is midnight at offset zero; with a time field it
/// becomes `2025-09-10 09:00:00 +0200` and the offset is mandatory.
fn parse_timestamp(date: &str, time: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match time {
        Some(time) => {
            let combined = format!("{date} {time}");
            DateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M:%S %z")
                .map_err(|_| LoadError::InvalidDate { value: combined })
        }
        None => {
            let date = parse_date(date)?;
            Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| LoadError::InvalidDate {
        value: value.to_string(),
    })
}

fn as_mapping(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object().ok_or_else(|| LoadError::FieldType {
        field: "(root)",
        expected: "mapping",
        value: body.to_string(),
    })
}

fn required_str(doc: &Map<String, Value>, field: &'static str) -> Result<String> {
    match doc.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(LoadError::FieldType {
            field,
            expected: "string",
            value: other.to_string(),
        }),
        None => Err(LoadError::RequiredField { field }),
    }
}

fn optional_str(doc: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(LoadError::FieldType {
            field,
            expected: "string",
            value: other.to_string(),
        }),
    }
}

fn optional_date(doc: &Map<String, Value>, field: &'static str) -> Result<Option<NaiveDate>> {
    match optional_str(doc, field)? {
        Some(value) => Ok(Some(parse_date(&value)?)),
        None => Ok(None),
    }
}

fn optional_str_list(doc: &Map<String, Value>, field: &'static str) -> Result<Vec<String>> {
    let items = match doc.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(LoadError::FieldType {
                field,
                expected: "list of strings",
                value: other.to_string(),
            })
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(LoadError::FieldType {
                field,
                expected: "list of strings",
                value: other.to_string(),
            }),
        })
        .collect()
}
