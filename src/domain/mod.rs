use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod booking;

/// Maximum number of places a single club can hold in one competition
pub const MAX_PLACES_PER_CLUB: u32 = 12;

/// Club that books competition places with its points budget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Unique name of the club
    pub name: String,
    /// Secretary email address, used to log in
    ///
    /// This is unique across clubs.
    pub email: String,
    /// Spendable points
    ///
    /// One point pays for one place.
    pub points: u32,
}

impl Club {
    pub fn new(name: impl Into<String>, email: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points,
        }
    }
}

/// Competition with a fixed number of places
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Unique name of the competition
    pub name: String,
    /// Start of the competition
    ///
    /// Booking closes once this date has passed.
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    /// Places still available
    #[serde(rename = "numberOfPlaces")]
    pub number_of_places: u32,
    /// Places reserved so far, one entry per club
    #[serde(default)]
    pub reserved_places: Vec<LedgerEntry>,
}

impl Competition {
    pub fn new(name: impl Into<String>, date: NaiveDateTime, number_of_places: u32) -> Self {
        Self {
            name: name.into(),
            date,
            number_of_places,
            reserved_places: Vec::default(),
        }
    }

    /// Ledger entry for the given club, if it already booked places
    pub fn entry(&self, club_name: &str) -> Option<&LedgerEntry> {
        self.reserved_places
            .iter()
            .find(|entry| entry.club_name == club_name)
    }

    /// Total number of places held by the given club
    pub fn reserved_by(&self, club_name: &str) -> u32 {
        self.entry(club_name)
            .map(|entry| entry.reserved_places)
            .unwrap_or(0)
    }
}

/// Running total of places reserved by one club in one competition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub club_name: String,
    /// Cumulative places, between 1 and [`MAX_PLACES_PER_CLUB`]
    pub reserved_places: u32,
}

/// Serde representation of competition dates, e.g. `2030-03-27 10:00:00`
pub mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
