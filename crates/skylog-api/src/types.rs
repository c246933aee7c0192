//! Wire types for the weather API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Search request body.
///
/// Optional fields serialize as explicit `null` rather than being omitted;
/// the server accepts either.
#[derive(Debug, Clone, Serialize)]
pub struct LocationQuery {
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl LocationQuery {
    /// Query with just a location, no date range or notes.
    pub fn location_only(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            start_date: None,
            end_date: None,
            notes: None,
        }
    }
}

/// Result of one weather search. Treated as immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub lat: f64,
    pub lon: f64,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

/// Current conditions block of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// One day of the forecast strip (typically five entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub icon: String,
    pub description: String,
}

/// A saved search as the server returns it.
///
/// The server also sends a cached `temps_json` blob alongside these fields;
/// it is opaque to the client and dropped during decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub location_input: String,
    pub normalized_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Partial update for a saved record.
///
/// Outer `None` omits the field entirely (leave unchanged). `Some(None)`
/// serializes as an explicit `null`, which the server reads as "clear this
/// field". A single-`Option` field with `skip_serializing_if` cannot make
/// that distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl RecordPatch {
    /// Map blank strings to their wire meaning: an emptied notes field
    /// becomes an explicit `null` (clear), and a blank location is dropped
    /// from the payload since the server never clears locations.
    pub fn normalized(mut self) -> Self {
        if matches!(&self.location_input, Some(s) if s.trim().is_empty()) {
            self.location_input = None;
        }
        if matches!(&self.notes, Some(Some(s)) if s.trim().is_empty()) {
            self.notes = Some(None);
        }
        self
    }
}

/// Extras for a location: an embeddable map link plus related videos.
///
/// Either section can be missing on a perfectly healthy response; an empty
/// bundle is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtrasBundle {
    #[serde(rename = "mapUrl", default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoRef>,
}

impl ExtrasBundle {
    /// True when there is nothing to show in either section.
    pub fn is_empty(&self) -> bool {
        self.map_url.is_none() && self.videos.is_empty()
    }
}

/// One related video entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub channel_title: String,
    pub url: String,
}

/// `GET /health` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Export formats offered by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    /// Value of the `fmt` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }

    /// True for formats the server delivers as a download attachment
    /// (handed to the browser) instead of a JSON round trip.
    pub fn is_download(self) -> bool {
        matches!(self, Self::Csv)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrapper the server uses for rendered markdown.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownExport {
    pub markdown: String,
}

/// Rendered export returned by the round-trip formats.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub content: String,
}
