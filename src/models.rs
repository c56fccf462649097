//! Domain models for the marina inventory. These types stay light-weight data
//! holders: the store owns the collection and the rules for mutating it, the
//! codec owns the text format, and the UI only reads them for display.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Longest boat name kept after decoding, counted in characters.
pub const MAX_NAME_LEN: usize = 127;
/// Longest trailer tag kept after decoding, counted in characters.
pub const MAX_TRAILER_TAG_LEN: usize = 15;

/// The category of storage a boat occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceKind {
    Slip,
    Land,
    Trailer,
    Storage,
    /// Sentinel for text that did not name a known place.
    Unknown,
}

impl PlaceKind {
    /// Resolve a place name case-insensitively. The persisted literal for
    /// trailers is `trailor`; the correct spelling is accepted too so hand
    /// edited files do not silently lose their trailer boats.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "slip" => PlaceKind::Slip,
            "land" => PlaceKind::Land,
            "trailor" | "trailer" => PlaceKind::Trailer,
            "storage" => PlaceKind::Storage,
            _ => PlaceKind::Unknown,
        }
    }

    /// Literal written to the data file.
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceKind::Slip => "slip",
            PlaceKind::Land => "land",
            PlaceKind::Trailer => "trailor",
            PlaceKind::Storage => "storage",
            PlaceKind::Unknown => "no_place",
        }
    }

    /// Monthly storage fee per foot of boat length.
    pub fn monthly_rate(self) -> Money {
        match self {
            PlaceKind::Slip => Money::from_cents(1250),
            PlaceKind::Land => Money::from_cents(1400),
            PlaceKind::Trailer => Money::from_cents(2500),
            PlaceKind::Storage => Money::from_cents(1120),
            PlaceKind::Unknown => Money::ZERO,
        }
    }
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Place-specific payload. The variant doubles as the boat's `PlaceKind`, so
/// a slip number can never be read off a boat parked on land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Slip(i32),
    Land(char),
    Trailer(String),
    Storage(i32),
    Unknown,
}

impl Location {
    pub fn kind(&self) -> PlaceKind {
        match self {
            Location::Slip(_) => PlaceKind::Slip,
            Location::Land(_) => PlaceKind::Land,
            Location::Trailer(_) => PlaceKind::Trailer,
            Location::Storage(_) => PlaceKind::Storage,
            Location::Unknown => PlaceKind::Unknown,
        }
    }

    /// Build a trailer location. The tag is trimmed and truncated to the
    /// stored width, matching what a reload of the data file yields.
    pub fn trailer(tag: &str) -> Self {
        let tag = truncate_chars(tag.trim(), MAX_TRAILER_TAG_LEN);
        Location::Trailer(tag.trim_end().to_string())
    }

    /// Text stored in the `extra` column of the data file.
    pub fn extra_field(&self) -> String {
        match self {
            Location::Slip(number) | Location::Storage(number) => number.to_string(),
            Location::Land(bay) => bay.to_string(),
            Location::Trailer(tag) => tag.clone(),
            Location::Unknown => String::new(),
        }
    }
}

/// A monetary amount held in whole cents. Balances only ever need two decimal
/// places, and integer cents keep charges and payments exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

/// Why a piece of text could not be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid amount")]
pub struct ParseMoneyError(String);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parse an amount, falling back to zero for anything non-numeric. This is
    /// the tolerant reading used for records loaded from disk.
    pub fn parse_lenient(text: &str) -> Self {
        text.parse().unwrap_or_default()
    }

    /// Multiply a per-unit amount by a whole quantity (feet, for charges).
    pub fn times(self, quantity: i32) -> Self {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ParseMoneyError(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(ParseMoneyError(trimmed.to_string()));
        }
        Ok(Money((value * 100.0).round() as i64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let text = format!("{sign}{}.{:02}", abs / 100, abs % 100);
        // Route through `pad` so width and alignment flags apply.
        f.pad(&text)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, amount| acc + amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One inventory entry. Names are compared case-insensitively everywhere but
/// stored exactly as entered so listings echo the owner's spelling.
pub struct Boat {
    pub name: String,
    /// Length in whole feet; the monthly charge is billed per foot.
    pub length: i32,
    pub location: Location,
    pub amount_owed: Money,
}

impl Boat {
    pub fn new(name: &str, length: i32, location: Location, amount_owed: Money) -> Self {
        Self {
            name: truncate_chars(name, MAX_NAME_LEN),
            length,
            location,
            amount_owed,
        }
    }

    pub fn place(&self) -> PlaceKind {
        self.location.kind()
    }

    /// Case-insensitive comparison used by every name lookup.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Fee added to the balance by one monthly billing run.
    pub fn monthly_charge(&self) -> Money {
        self.place().monthly_rate().times(self.length)
    }
}

/// Keep at most `max` characters of `text`, respecting char boundaries.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_names_parse_case_insensitively() {
        assert_eq!(PlaceKind::parse("SLIP"), PlaceKind::Slip);
        assert_eq!(PlaceKind::parse("Land"), PlaceKind::Land);
        assert_eq!(PlaceKind::parse("trailor"), PlaceKind::Trailer);
        assert_eq!(PlaceKind::parse("Trailer"), PlaceKind::Trailer);
        assert_eq!(PlaceKind::parse("storage"), PlaceKind::Storage);
        assert_eq!(PlaceKind::parse("no_place"), PlaceKind::Unknown);
        assert_eq!(PlaceKind::parse("dock"), PlaceKind::Unknown);
    }

    #[test]
    fn location_variant_decides_place() {
        assert_eq!(Location::Slip(4).kind(), PlaceKind::Slip);
        assert_eq!(Location::Land('B').kind(), PlaceKind::Land);
        assert_eq!(Location::trailer("ABC123").kind(), PlaceKind::Trailer);
        assert_eq!(Location::Storage(9).kind(), PlaceKind::Storage);
        assert_eq!(Location::Unknown.kind(), PlaceKind::Unknown);
    }

    #[test]
    fn trailer_tags_are_truncated() {
        let location = Location::trailer("ABCDEFGHIJKLMNOPQRST");
        assert_eq!(location, Location::Trailer("ABCDEFGHIJKLMNO".to_string()));
    }

    #[test]
    fn money_parses_and_displays_two_decimals() {
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::from_cents(1250));
        assert_eq!(" 0.1 ".parse::<Money>().unwrap(), Money::from_cents(10));
        assert_eq!(Money::from_cents(37500).to_string(), "375.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(101)), "    1.01");
        assert!("abc".parse::<Money>().is_err());
        assert!("inf".parse::<Money>().is_err());
        assert_eq!(Money::parse_lenient("abc"), Money::ZERO);
    }

    #[test]
    fn monthly_charge_uses_fixed_rates() {
        let slip = Boat::new("Sea Breeze", 30, Location::Slip(12), Money::ZERO);
        assert_eq!(slip.monthly_charge(), Money::from_cents(37500));

        let stored = Boat::new("Dinghy", 10, Location::Storage(3), Money::ZERO);
        assert_eq!(stored.monthly_charge(), Money::from_cents(11200));

        let lost = Boat::new("Drifter", 40, Location::Unknown, Money::ZERO);
        assert_eq!(lost.monthly_charge(), Money::ZERO);
    }

    #[test]
    fn names_match_ignoring_case_and_are_truncated() {
        let boat = Boat::new("Sea Breeze", 30, Location::Slip(12), Money::ZERO);
        assert!(boat.matches_name("sea breeze"));
        assert!(!boat.matches_name("sea"));

        let long = Boat::new(&"x".repeat(200), 1, Location::Unknown, Money::ZERO);
        assert_eq!(long.name.chars().count(), MAX_NAME_LEN);
    }
}
