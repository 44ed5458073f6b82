//! Reverse-geocoding collaborator and the travel tagger.
//!
//! The external service maps a coordinate pair to an administrative
//! region name. When the name mentions one of the configured travel
//! destinations, the photo gains a `여행` content tag before
//! classification. Every failure of the external call is swallowed with
//! a warning: classification must never fail because geocoding is down.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use sweep_settings::types::GeocoderSettings;

/// The travel interest tag injected on a destination match.
pub const TRAVEL_TAG: &str = "여행";

/// Errors from the reverse-geocoding collaborator.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Transport-level failure.
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("geocoder returned status {0}")]
    Status(u16),
}

/// Maps a coordinate pair to a human-readable region name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// The region name for `(lat, lon)`, or `None` if the service has no
    /// answer for the coordinate.
    async fn region_name(&self, lat: f64, lon: f64) -> Result<Option<String>, GeoError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// NCP reverse-geocode client
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GcResponse {
    #[serde(default)]
    results: Vec<GcResult>,
}

#[derive(Debug, Deserialize)]
struct GcResult {
    region: Option<GcRegion>,
}

#[derive(Debug, Deserialize)]
struct GcRegion {
    area1: Option<GcArea>,
    area2: Option<GcArea>,
}

#[derive(Debug, Deserialize)]
struct GcArea {
    #[serde(default)]
    name: String,
}

/// Naver Cloud Platform reverse-geocode client.
pub struct NcpGeocoder {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl NcpGeocoder {
    /// Build a client from settings.
    #[must_use]
    pub fn new(settings: &GeocoderSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            key_id: settings.key_id.clone(),
            key_secret: settings.key_secret.clone(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NcpGeocoder {
    async fn region_name(&self, lat: f64, lon: f64) -> Result<Option<String>, GeoError> {
        // NCP expects coords as "longitude,latitude".
        let url = format!("{}/gc", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("coords", format!("{lon},{lat}")),
                ("output", "json".to_owned()),
                ("orders", "admcode".to_owned()),
            ])
            .header("x-ncp-apigw-api-key-id", &self.key_id)
            .header("x-ncp-apigw-api-key", &self.key_secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body: GcResponse = response.json().await?;
        let Some(region) = body.results.into_iter().next().and_then(|r| r.region) else {
            return Ok(None);
        };

        let mut parts = Vec::new();
        if let Some(area1) = region.area1 {
            if !area1.name.is_empty() {
                parts.push(area1.name);
            }
        }
        if let Some(area2) = region.area2 {
            if !area2.name.is_empty() {
                parts.push(area2.name);
            }
        }
        if parts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(parts.join(" ")))
        }
    }
}

/// Geocoder that never answers. Used when geocoding is disabled and in
/// tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopGeocoder;

#[async_trait]
impl ReverseGeocoder for NoopGeocoder {
    async fn region_name(&self, _lat: f64, _lon: f64) -> Result<Option<String>, GeoError> {
        Ok(None)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Travel tagger
// ─────────────────────────────────────────────────────────────────────────────

/// Append the travel tag to `content_tags` when the coordinate resolves
/// to a configured destination. Geocoder failures are logged and
/// swallowed; the tag set is left unchanged.
pub async fn maybe_tag_travel(
    geocoder: &dyn ReverseGeocoder,
    content_tags: &mut Vec<String>,
    lat: f64,
    lon: f64,
    destinations: &[String],
) {
    let region = match geocoder.region_name(lat, lon).await {
        Ok(Some(region)) => region,
        Ok(None) => return,
        Err(err) => {
            warn!(lat, lon, error = %err, "reverse geocoding failed, skipping travel tag");
            return;
        }
    };

    let matched = destinations.iter().any(|dest| region.contains(dest.as_str()));
    if matched && !content_tags.iter().any(|tag| tag == TRAVEL_TAG) {
        debug!(%region, "travel destination matched");
        content_tags.push(TRAVEL_TAG.to_owned());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> GeocoderSettings {
        GeocoderSettings {
            enabled: true,
            base_url,
            key_id: "test-id".into(),
            key_secret: "test-secret".into(),
        }
    }

    fn destinations() -> Vec<String> {
        vec!["제주".into(), "부산".into()]
    }

    #[tokio::test]
    async fn resolves_region_name_from_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .and(query_param("coords", "126.5312,33.4996"))
            .and(header("x-ncp-apigw-api-key-id", "test-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "region": {
                        "area1": {"name": "제주특별자치도"},
                        "area2": {"name": "제주시"}
                    }
                }]
            })))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let region = geocoder.region_name(33.4996, 126.5312).await.unwrap();
        assert_eq!(region.as_deref(), Some("제주특별자치도 제주시"));
    }

    #[tokio::test]
    async fn empty_results_resolve_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let region = geocoder.region_name(37.0, 127.0).await.unwrap();
        assert!(region.is_none());
    }

    #[tokio::test]
    async fn tags_travel_on_destination_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "region": {
                        "area1": {"name": "부산광역시"},
                        "area2": {"name": "해운대구"}
                    }
                }]
            })))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let mut tags = vec!["beach".to_owned()];
        maybe_tag_travel(&geocoder, &mut tags, 35.16, 129.16, &destinations()).await;
        assert_eq!(tags, vec!["beach".to_owned(), TRAVEL_TAG.to_owned()]);
    }

    #[tokio::test]
    async fn does_not_duplicate_existing_travel_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "region": {"area1": {"name": "제주특별자치도"}, "area2": {"name": "서귀포시"}}
                }]
            })))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let mut tags = vec![TRAVEL_TAG.to_owned()];
        maybe_tag_travel(&geocoder, &mut tags, 33.25, 126.56, &destinations()).await;
        assert_eq!(tags.len(), 1);
    }

    #[tokio::test]
    async fn geocoder_failure_leaves_tags_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let mut tags = vec!["sky".to_owned()];
        maybe_tag_travel(&geocoder, &mut tags, 35.16, 129.16, &destinations()).await;
        assert_eq!(tags, vec!["sky".to_owned()]);
    }

    #[tokio::test]
    async fn non_matching_region_adds_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "region": {"area1": {"name": "서울특별시"}, "area2": {"name": "마포구"}}
                }]
            })))
            .mount(&server)
            .await;

        let geocoder = NcpGeocoder::new(&settings(server.uri()));
        let mut tags = Vec::new();
        maybe_tag_travel(&geocoder, &mut tags, 37.55, 126.9, &destinations()).await;
        assert!(tags.is_empty());
    }
}
