//! Centralized default constants for voisinage.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.
//!
//! Organized by domain area.

// =============================================================================
// VISION ANALYSIS
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const VISION_BASE_URL: &str = "https://api.openai.com/v1";

/// Default multimodal model used for item photos.
pub const VISION_MODEL: &str = "gpt-4o-mini";

/// Completion token budget for one analysis.
pub const VISION_MAX_TOKENS: u32 = 1000;

/// Low temperature keeps the structured output stable.
pub const VISION_TEMPERATURE: f32 = 0.1;

/// Request timeout in seconds.
pub const VISION_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the API credential.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API endpoint.
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

// =============================================================================
// IMAGE PREPARATION
// =============================================================================

/// Longest side, in pixels, of an image sent for analysis.
pub const IMAGE_MAX_DIMENSION: u32 = 1024;

/// JPEG quality (1-100) used when re-encoding images.
pub const IMAGE_JPEG_QUALITY: u8 = 80;

// =============================================================================
// RETRY
// =============================================================================

/// Retries after the first request when the endpoint answers HTTP 429.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Base backoff delay; doubled on each attempt.
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Upper bound of the random jitter added to each backoff delay.
pub const RETRY_MAX_JITTER_MS: u64 = 1000;

// =============================================================================
// ANALYSIS RESULT LIMITS
// =============================================================================

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Maximum brand/model length in characters.
pub const BRAND_MAX_CHARS: usize = 50;

/// Maximum number of tags kept from a model response.
pub const TAGS_MAX: usize = 10;

/// Maximum length of a single tag.
pub const TAG_MAX_CHARS: usize = 30;

/// Largest estimated value (in euros) accepted from the model.
pub const ESTIMATED_VALUE_MAX: f64 = 100_000.0;

/// Confidence used when the model omits one.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Title used when the model returns none.
pub const FALLBACK_TITLE: &str = "Untitled item";

// =============================================================================
// CATEGORY DETECTION
// =============================================================================

/// Confidence reported when no keyword matched at all.
pub const KEYWORD_FALLBACK_CONFIDENCE: f32 = 0.1;

/// Below this keyword confidence the scorer suggests adding detail.
pub const KEYWORD_LOW_CONFIDENCE: f32 = 0.7;

/// Runner-up within this ratio of the winner triggers an ambiguity hint.
pub const KEYWORD_AMBIGUITY_RATIO: f32 = 0.8;

/// Maximum number of alternative categories reported.
pub const CATEGORY_MAX_ALTERNATIVES: usize = 3;

/// Maximum number of matched terms quoted in an alternative's reason.
pub const CATEGORY_REASON_TERMS: usize = 3;

/// AI confidence above which the AI category is trusted outright.
pub const FUSION_TRUST_AI_ABOVE: f32 = 0.8;

/// Lower bound of the medium AI confidence band.
pub const FUSION_MEDIUM_AI_FROM: f32 = 0.5;

/// Margin the keyword confidence must exceed a medium AI confidence by.
pub const FUSION_OVERRIDE_MARGIN: f32 = 0.2;

/// Keyword confidence needed to override a low-confidence AI guess.
pub const FUSION_LOW_AI_TEXT_MIN: f32 = 0.3;

// =============================================================================
// GEOSPATIAL
// =============================================================================

/// Mean Earth radius in kilometers (haversine).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Equatorial circumference in kilometers (Web Mercator pixel projection).
pub const EARTH_CIRCUMFERENCE_KM: f64 = 40075.0;

/// Web Mercator tile size in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Default clustering radius in pixels.
pub const CLUSTER_RADIUS_PX: f64 = 50.0;

/// Lowest zoom level at which markers are clustered.
pub const CLUSTER_MIN_ZOOM: f64 = 0.0;

/// Highest zoom level at which markers are clustered.
pub const CLUSTER_MAX_ZOOM: f64 = 16.0;

// =============================================================================
// GEOCODING
// =============================================================================

/// Default Nominatim-compatible geocoding endpoint.
pub const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// User-Agent sent to the geocoder (Nominatim rejects anonymous clients).
pub const GEOCODER_USER_AGENT: &str = "voisinage/1.0";

/// Geocoding cache entry lifetime in seconds (1 hour).
pub const GEOCODE_CACHE_TTL_SECS: u64 = 3600;

/// Maximum number of cached geocoding answers (least recently used evicted).
pub const GEOCODE_CACHE_CAPACITY: usize = 1000;

/// Maximum results requested from forward geocoding.
pub const GEOCODE_SEARCH_LIMIT: usize = 5;

/// Geocoding request timeout in seconds.
pub const GEOCODE_TIMEOUT_SECS: u64 = 10;
