//! Wire types shared by the insightArc content client and its consumers.
//!
//! Listing items mirror the `metadata.json` documents kept in the content
//! repository; `ContentFile` mirrors the GitHub contents API file payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A tag attached to a listing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
    #[serde(default)]
    pub link: String,
}

/// One blog or inspiration entry from a `metadata.json` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: String,
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_stamp: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
}

/// A single file object returned by the GitHub contents API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// A Markdown post split into its frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogContent {
    pub meta: BTreeMap<String, String>,
    pub content: String,
}

/// Persisted cache entry: creation time in milliseconds since the epoch plus
/// the cached payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub timestamp: i64,
    pub data: T,
}

/// Serde adapter for optional ISO 8601 timestamps.
///
/// Accepts RFC 3339 date-times, date-times without an offset (read as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC). A value that fits none of these
/// reads as `None` so one bad row does not sink a whole listing. Always writes
/// RFC 3339.
pub mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
        macros::format_description,
    };
    use tracing::warn;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => {
                let formatted = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => match parse(value) {
                Ok(ts) => Ok(Some(ts)),
                Err(err) => {
                    warn!(target = "insightarc::api_types", error = %err, "Ignoring unreadable timestamp");
                    Ok(None)
                }
            },
        }
    }

    pub fn parse(value: &str) -> Result<OffsetDateTime, String> {
        if let Ok(ts) = OffsetDateTime::parse(value, &Rfc3339) {
            return Ok(ts);
        }
        if let Ok(local) = parse_local(value) {
            return Ok(local.assume_utc());
        }
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .map(|date| date.midnight().assume_utc())
            .map_err(|err| format!("invalid timestamp `{value}`: {err}"))
    }

    fn parse_local(value: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            )
        })
    }
}
