//! Forward and reverse geocoding against a Nominatim-compatible service,
//! with a bounded in-memory LRU cache whose entries also expire after a TTL.

use chrono::{DateTime, Utc};
use lru::LruCache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use voisinage_core::defaults::{
    GEOCODER_URL, GEOCODER_USER_AGENT, GEOCODE_CACHE_CAPACITY, GEOCODE_CACHE_TTL_SECS,
    GEOCODE_SEARCH_LIMIT, GEOCODE_TIMEOUT_SECS,
};
use voisinage_core::{Error, GeoPoint, Result};

/// Geocoding client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoConfig {
    pub base_url: String,
    /// Public Nominatim instances reject requests without one.
    pub user_agent: String,
    pub cache_ttl_secs: u64,
    /// Entries kept before the least recently used one is evicted. Must be non-zero.
    pub cache_capacity: usize,
    pub search_limit: usize,
    pub timeout_seconds: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: GEOCODER_URL.to_string(),
            user_agent: GEOCODER_USER_AGENT.to_string(),
            cache_ttl_secs: GEOCODE_CACHE_TTL_SECS,
            cache_capacity: GEOCODE_CACHE_CAPACITY,
            search_limit: GEOCODE_SEARCH_LIMIT,
            timeout_seconds: GEOCODE_TIMEOUT_SECS,
        }
    }
}

impl GeoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("VOISINAGE_GEOCODER_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            user_agent: std::env::var("VOISINAGE_USER_AGENT")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.user_agent),
            cache_ttl_secs: std::env::var("VOISINAGE_GEOCODE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            cache_capacity: std::env::var("VOISINAGE_GEOCODE_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            ..defaults
        }
    }
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub importance: Option<f64>,
}

impl GeocodeResult {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lon,
        }
    }
}

/// Nominatim wire format: coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    importance: Option<f64>,
}

impl TryFrom<NominatimPlace> for GeocodeResult {
    type Error = Error;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let parse = |raw: &str, axis: &str| {
            raw.trim().parse::<f64>().map_err(|_| {
                Error::InvalidCoordinate(format!("unparseable {} from geocoder: {:?}", axis, raw))
            })
        };
        let result = GeocodeResult {
            lat: parse(&place.lat, "latitude")?,
            lon: parse(&place.lon, "longitude")?,
            display_name: place.display_name,
            importance: place.importance,
        };
        result.point().validate()?;
        Ok(result)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<GeocodeResult>,
    stored_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, ttl_secs: u64) -> bool {
        let age_ms = Utc::now()
            .signed_duration_since(self.stored_at)
            .num_milliseconds();
        age_ms < 0 || age_ms as u64 >= ttl_secs.saturating_mul(1000)
    }
}

/// Geocoding client. Cheap to share behind an `Arc`.
pub struct GeocodingClient {
    client: Client,
    config: GeoConfig,
    cache: Mutex<LruCache<String, CacheEntry>>,
}

impl GeocodingClient {
    pub fn new(config: GeoConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.cache_capacity)
            .ok_or_else(|| Error::Config("geocode cache capacity must be non-zero".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "geo",
            component = "geocoding",
            url = %config.base_url,
            ttl_secs = config.cache_ttl_secs,
            capacity = config.cache_capacity,
            "Initializing geocoding client"
        );

        Ok(Self {
            client,
            config,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeoConfig::from_env())
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Places matching a free-text address, best match first.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>> {
        let query = query.trim();
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Err(Error::InvalidInput("empty geocoding query".to_string()));
        }
        let key = format!("search:{}", normalized);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let limit = self.config.search_limit.to_string();
        let places: Vec<NominatimPlace> = self
            .get(
                "/search",
                &[
                    ("format", "json"),
                    ("q", query),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        let results = places
            .into_iter()
            .map(GeocodeResult::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "geo",
            component = "geocoding",
            op = "search",
            result_count = results.len(),
            "Geocoding search complete"
        );
        self.store(key, results.clone()).await;
        Ok(results)
    }

    /// The address closest to `point`, if the service knows one.
    pub async fn reverse(&self, point: GeoPoint) -> Result<Option<GeocodeResult>> {
        point.validate()?;
        let key = reverse_key(point);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit.into_iter().next());
        }

        let lat = point.lat.to_string();
        let lon = point.lng.to_string();
        let value: serde_json::Value = self
            .get(
                "/reverse",
                &[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())],
            )
            .await?;

        // Nominatim answers 200 with {"error": "Unable to geocode"} for open sea.
        let result = if value.get("error").is_some() {
            None
        } else {
            let place: NominatimPlace = serde_json::from_value(value)?;
            Some(GeocodeResult::try_from(place)?)
        };

        self.store(key, result.iter().cloned().collect()).await;
        Ok(result)
    }

    /// Drop expired entries; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let ttl = self.config.cache_ttl_secs;
        let mut cache = self.cache.lock().await;
        let expired: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            cache.pop(key);
        }
        expired.len()
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn cached(&self, key: &str) -> Option<Vec<GeocodeResult>> {
        let mut cache = self.cache.lock().await;
        match cache.get(key) {
            Some(entry) if !entry.is_expired(self.config.cache_ttl_secs) => {
                debug!(subsystem = "geo", component = "geocoding", key, "Cache hit");
                return Some(entry.results.clone());
            }
            Some(_) => {}
            None => return None,
        }
        cache.pop(key);
        None
    }

    async fn store(&self, key: String, results: Vec<GeocodeResult>) {
        if self.config.cache_ttl_secs == 0 {
            return;
        }
        self.cache.lock().await.put(
            key,
            CacheEntry {
                results,
                stored_at: Utc::now(),
            },
        );
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "geo",
                component = "geocoding",
                status = status.as_u16(),
                "Geocoder request failed"
            );
            return Err(Error::Request(format!(
                "Geocoder returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Lowercase and collapse whitespace so equivalent queries share a cache slot.
fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Five decimals is about one meter.
fn reverse_key(point: GeoPoint) -> String {
    format!("reverse:{:.5},{:.5}", point.lat, point.lng)
}
