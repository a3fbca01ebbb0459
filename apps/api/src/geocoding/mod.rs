//! Geocoding — resolves free-text locations to coordinates.
//!
//! The geocoder is an external collaborator behind a trait object so the
//! HTTP client can be swapped out (tests use an in-memory stub).

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Carried in `AppState` as `Arc<dyn Geocoder>`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a location query to coordinates. `Ok(None)` means the
    /// service answered but found no match.
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, AppError>;
}

/// Nominatim-style geocoder: GET {base}/search?q=...&format=json&limit=1,
/// first result wins.
pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[derive(Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, AppError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let results: Vec<NominatimResult> = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header("User-Agent", concat!("job-board-api/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| AppError::Geocode(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Geocode(format!("bad status: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Geocode(format!("invalid response body: {e}")))?;

        let Some(first) = results.first() else {
            return Ok(None);
        };
        let latitude = first
            .lat
            .parse::<f64>()
            .map_err(|e| AppError::Geocode(format!("invalid latitude: {e}")))?;
        let longitude = first
            .lon
            .parse::<f64>()
            .map_err(|e| AppError::Geocode(format!("invalid longitude: {e}")))?;
        Ok(Some(GeoPoint {
            latitude,
            longitude,
        }))
    }
}
