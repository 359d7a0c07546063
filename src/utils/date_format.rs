use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, macros::format_description};

// Date inputs and date columns both use plain ISO dates.
pub fn parse_iso_date(date_str: &str) -> Result<Date, String> {
    // Timestamps coming back from the store keep only their date part
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date_part.trim(), &format)
        .map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

#[must_use]
pub fn format_iso_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    // An ISO calendar date always formats
    date.format(&format).unwrap_or_default()
}

pub mod iso_date_format {
    use super::{Date, Deserialize, Deserializer, Serializer, format_description, serde};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(&format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date_str = String::deserialize(deserializer)?;
        super::parse_iso_date(&date_str).map_err(serde::de::Error::custom)
    }
}
