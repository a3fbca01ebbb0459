use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::geocoding::Geocoder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable geocoding collaborator. Default: NominatimGeocoder.
    pub geocoder: Arc<dyn Geocoder>,
}
