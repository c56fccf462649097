//! One boat per line: `name,length,place,extra,amountOwed`.
//!
//! Two readings of the same format live here. Records loaded from disk are
//! decoded leniently, so a damaged row still becomes a boat with zeroed
//! numbers instead of aborting the whole load. Records typed in by the user go
//! through the strict decoder, which refuses anything incomplete.

use thiserror::Error;
use tracing::debug;

use crate::models::{Boat, Location, Money, PlaceKind};

/// Number of comma-separated columns in a record.
const FIELD_COUNT: usize = 5;
/// Column names in file order, used in error messages.
const FIELD_NAMES: [&str; FIELD_COUNT] = ["name", "length", "place", "extra", "amount owed"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing {field} field (expected Name,Length,Place,Extra,AmountOwed)")]
    MissingField { field: &'static str },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid place type '{0}'")]
    UnknownPlace(String),
}

/// Split a record into at most five columns. Anything after the fourth comma
/// belongs to the amount column.
fn split_fields(line: &str) -> Vec<&str> {
    strip_line_ending(line).splitn(FIELD_COUNT, ',').collect()
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn lenient_int(field: &'static str, text: &str) -> i32 {
    text.trim().parse().unwrap_or_else(|_| {
        debug!(field, value = text, "non-numeric field defaulted to 0");
        0
    })
}

fn lenient_money(text: &str) -> Money {
    text.parse().unwrap_or_else(|_| {
        debug!(value = text, "non-numeric amount defaulted to 0.00");
        Money::ZERO
    })
}

/// Decode a record the way the data file is read: never fails, missing or
/// garbled columns fall back to empty/zero values and unknown places become
/// `PlaceKind::Unknown`.
pub fn decode_lenient(line: &str) -> Boat {
    let fields = split_fields(line);
    let field = |idx: usize| fields.get(idx).copied().unwrap_or("");

    let name = field(0);
    let length = lenient_int("length", field(1));
    let extra = field(3);
    let location = match PlaceKind::parse(field(2)) {
        PlaceKind::Slip => Location::Slip(lenient_int("extra", extra)),
        PlaceKind::Land => Location::Land(extra.trim().chars().next().unwrap_or(' ')),
        PlaceKind::Trailer => Location::trailer(extra.trim()),
        PlaceKind::Storage => Location::Storage(lenient_int("extra", extra)),
        PlaceKind::Unknown => Location::Unknown,
    };
    let amount_owed = lenient_money(field(4));

    Boat::new(name, length, location, amount_owed)
}

/// Decode a record typed in by the user. Every column must be present and
/// well formed: a non-empty name, a positive length, a known place with a
/// matching extra value, and a non-negative amount.
pub fn decode_strict(line: &str) -> Result<Boat, DecodeError> {
    let fields = split_fields(line);
    if let Some(missing) = FIELD_NAMES.get(fields.len()).copied() {
        return Err(DecodeError::MissingField { field: missing });
    }
    let (name, length_raw, place_raw, extra, amount_raw) =
        (fields[0], fields[1], fields[2], fields[3].trim(), fields[4]);

    if name.trim().is_empty() {
        return Err(DecodeError::MissingField { field: "name" });
    }

    let length: i32 = length_raw
        .trim()
        .parse()
        .map_err(|_| invalid("length", length_raw, "must be a whole number of feet"))?;
    if length <= 0 {
        return Err(invalid("length", length_raw, "must be greater than zero"));
    }

    if extra.is_empty() {
        return Err(DecodeError::MissingField { field: "extra" });
    }

    let location = match PlaceKind::parse(place_raw) {
        PlaceKind::Slip => Location::Slip(parse_number("slip number", extra)?),
        PlaceKind::Land => {
            let mut chars = extra.chars();
            match (chars.next(), chars.next()) {
                (Some(bay), None) if bay.is_alphabetic() => Location::Land(bay),
                _ => return Err(invalid("bay letter", extra, "must be a single letter")),
            }
        }
        PlaceKind::Trailer => Location::trailer(extra),
        PlaceKind::Storage => Location::Storage(parse_number("storage number", extra)?),
        PlaceKind::Unknown => return Err(DecodeError::UnknownPlace(place_raw.trim().to_string())),
    };

    let amount_owed: Money = amount_raw
        .parse()
        .map_err(|_| invalid("amount owed", amount_raw, "must be a number"))?;
    if amount_owed.is_negative() {
        return Err(invalid("amount owed", amount_raw, "cannot be negative"));
    }

    Ok(Boat::new(name, length, location, amount_owed))
}

fn parse_number(field: &'static str, text: &str) -> Result<i32, DecodeError> {
    text.parse()
        .map_err(|_| invalid(field, text, "must be a whole number"))
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> DecodeError {
    DecodeError::InvalidField {
        field,
        value: value.trim().to_string(),
        reason,
    }
}

/// Render a boat as one record, without the trailing newline.
pub fn encode(boat: &Boat) -> String {
    format!(
        "{},{},{},{},{}",
        boat.name,
        boat.length,
        boat.place().as_str(),
        boat.location.extra_field(),
        boat.amount_owed
    )
}
