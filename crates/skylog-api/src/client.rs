//! HTTP client for the weather API.

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::ApiError;
use crate::types::*;

/// Typed façade over the remote weather API.
///
/// The base URL is injected at construction so tests can point it at a mock
/// server. Requests go out exactly once: no retries, and no timeouts beyond
/// what the transport itself enforces.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given API base, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Health probe.
    #[instrument(skip(self), level = "info")]
    pub async fn health(&self) -> Result<Health, ApiError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Run a weather search. The server geocodes the location, looks up
    /// current conditions plus the forecast, and decides for itself whether
    /// the search leaves a history record behind.
    #[instrument(skip(self, query), level = "info", fields(location = %query.location))]
    pub async fn search_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ApiError> {
        let url = format!("{}/weather/search", self.base_url);
        let response = self.client.post(&url).json(query).send().await?;
        self.handle_response(response).await
    }

    /// List all saved search records.
    #[instrument(skip(self), level = "info")]
    pub async fn list_records(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let url = format!("{}/records", self.base_url);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Apply a partial update to a record. Returns the updated row; callers
    /// keeping a cache should re-fetch the list rather than splice this in.
    #[instrument(skip(self, patch), level = "info")]
    pub async fn update_record(
        &self,
        id: i64,
        patch: &RecordPatch,
    ) -> Result<HistoryRecord, ApiError> {
        let url = format!("{}/records/{}", self.base_url, id);
        let response = self.client.put(&url).json(patch).send().await?;
        self.handle_response(response).await
    }

    /// Delete a record. The server's `{"status": "deleted"}` ack carries
    /// nothing beyond the status code and is not decoded.
    #[instrument(skip(self), level = "info")]
    pub async fn delete_record(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/records/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    /// Fetch the extras bundle (map link plus related videos) for a location.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_extras(
        &self,
        location_name: &str,
        lat: f64,
        lon: f64,
    ) -> Result<ExtrasBundle, ApiError> {
        let url = format!("{}/extras", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("location_name", location_name)])
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch a rendered export. JSON comes back pretty-printed, markdown is
    /// unwrapped from its `{"markdown": ...}` envelope, and CSV passes
    /// through verbatim (though the CSV flow normally goes through
    /// `export_url` and the browser instead).
    #[instrument(skip(self), level = "info")]
    pub async fn export(&self, format: ExportFormat) -> Result<ExportDocument, ApiError> {
        let url = self.export_url(format);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let content = match format {
            ExportFormat::Csv => body,
            ExportFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&body)
                    .map_err(|e| ApiError::Decode(e.to_string()))?;
                serde_json::to_string_pretty(&value).map_err(|e| ApiError::Decode(e.to_string()))?
            }
            ExportFormat::Markdown => {
                let doc: MarkdownExport =
                    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
                doc.markdown
            }
        };

        Ok(ExportDocument { format, content })
    }

    /// Navigable URL for an export, used when the browser owns the transfer.
    pub fn export_url(&self, format: ExportFormat) -> String {
        format!("{}/export?fmt={}", self.base_url, format.as_str())
    }

    /// Map a response to a decoded body or a typed error. Success statuses
    /// decode as JSON; anything else becomes `ApiError::Server` with the
    /// structured `detail` pulled out of the body when present.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn nairobi_snapshot() -> serde_json::Value {
        json!({
            "location_name": "Nairobi",
            "lat": -1.2864,
            "lon": 36.8172,
            "current": {
                "description": "Partly cloudy",
                "icon": "partly-cloudy",
                "temperature": 24.5,
                "feels_like": 25.1,
                "humidity": 62,
                "wind_speed": 3.4
            },
            "forecast": [
                {
                    "date": "2024-03-01",
                    "min_temp": 16.0,
                    "max_temp": 27.2,
                    "icon": "sunny",
                    "description": "Sunny"
                }
            ]
        })
    }

    #[tokio::test]
    async fn health_round_trip() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let health = client.health().await.unwrap();

        assert!(health.is_ok());
    }

    #[tokio::test]
    async fn search_posts_full_body_and_decodes_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/weather/search"))
            .and(body_json(json!({
                "location": "Nairobi",
                "start_date": "2024-03-01",
                "end_date": "2024-03-05",
                "notes": "Safari trip"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(nairobi_snapshot()))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let query = LocationQuery {
            location: "Nairobi".to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5),
            notes: Some("Safari trip".to_string()),
        };
        let snapshot = client.search_weather(&query).await.unwrap();

        assert_eq!(snapshot.location_name, "Nairobi");
        assert_eq!(snapshot.current.temperature, 24.5);
        assert_eq!(snapshot.forecast.len(), 1);
    }

    #[tokio::test]
    async fn server_error_carries_structured_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/weather/search"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Location not found"})),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let err = client
            .search_weather(&LocationQuery::location_only("Xyzzy"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.detail(), Some("Location not found"));
    }

    #[tokio::test]
    async fn server_error_without_structured_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/records"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let err = client.list_records().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), None);
    }

    #[tokio::test]
    async fn malformed_success_payload_is_a_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/weather/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let err = client
            .search_weather(&LocationQuery::location_only("Oslo"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Nothing listens on port 1.
        let client = ApiClient::new("http://127.0.0.1:1");
        let err = client.list_records().await.unwrap_err();

        assert!(err.is_network());
    }

    #[tokio::test]
    async fn update_transmits_explicit_null_for_cleared_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/records/7"))
            .and(body_json(json!({"notes": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "location_input": "nairobi",
                "normalized_name": "Nairobi",
                "lat": -1.2864,
                "lon": 36.8172,
                "notes": null
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let patch = RecordPatch {
            notes: Some(None),
            ..Default::default()
        };
        let record = client.update_record(7, &patch).await.unwrap();

        assert_eq!(record.id, 7);
        assert!(record.notes.is_none());
    }

    #[tokio::test]
    async fn delete_record_accepts_ack_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/records/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        assert!(client.delete_record(3).await.is_ok());
    }

    #[tokio::test]
    async fn extras_sends_location_as_query_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/extras"))
            .and(query_param("location_name", "Nairobi"))
            .and(query_param("lat", "-1.2864"))
            .and(query_param("lon", "36.8172"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mapUrl": "https://maps.example.com/embed?q=-1.2864,36.8172",
                "videos": [{
                    "videoId": "abc123",
                    "title": "Nairobi walking tour",
                    "thumbnail": null,
                    "channelTitle": "City Walks",
                    "url": "https://videos.example.com/watch?v=abc123"
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let bundle = client.fetch_extras("Nairobi", -1.2864, 36.8172).await.unwrap();

        assert!(bundle.map_url.is_some());
        assert_eq!(bundle.videos.len(), 1);
        assert_eq!(bundle.videos[0].video_id, "abc123");
    }

    #[tokio::test]
    async fn export_json_returns_pretty_printed_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/export"))
            .and(query_param("fmt", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "location_input": "nairobi"}
            ])))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let document = client.export(ExportFormat::Json).await.unwrap();

        assert_eq!(document.format, ExportFormat::Json);
        assert!(document.content.contains("nairobi"));
        assert!(document.content.contains('\n'));
    }

    #[tokio::test]
    async fn export_markdown_unwraps_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/export"))
            .and(query_param("fmt", "markdown"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"markdown": "# Weather history\n"})),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri());
        let document = client.export(ExportFormat::Markdown).await.unwrap();

        assert_eq!(document.content, "# Weather history\n");
    }

    #[tokio::test]
    async fn export_url_carries_format_parameter() {
        let client = ApiClient::new("http://localhost:8000/api/");

        assert_eq!(
            client.export_url(ExportFormat::Csv),
            "http://localhost:8000/api/export?fmt=csv"
        );
    }
}
