//! # voisinage-inference
//!
//! Category detection and photo analysis for voisinage listings.
//!
//! This crate provides:
//! - Keyword category scoring over title and description
//! - Fusion of a model-reported category with the keyword result
//! - OpenAI-compatible vision analyzer with 429 backoff and cancellation
//! - JSON extraction and sanitization of model output
//! - Image downscaling and JPEG re-encoding before upload
//! - TOML/environment configuration
//!
//! # Example
//!
//! ```rust
//! use voisinage_inference::score_text;
//! use voisinage_core::Category;
//!
//! let result = score_text("Perceuse Bosch électrique 18V", "");
//! assert_eq!(result.category, Category::Tools);
//! ```

pub mod config;
pub mod extract;
pub mod fusion;
pub mod image_prep;
pub mod openai;
pub mod prompts;
pub mod retry;
pub mod sanitize;
pub mod scorer;
pub mod vision;

// Re-export core types
pub use voisinage_core::*;

pub use config::{AnalysisConfig, ConfigError, ConfigResult, ImageSettings, VisionSettings};
pub use extract::{extract_json_object, first_json_object};
pub use fusion::{decide, fuse_category, FusionDecision};
pub use image_prep::{bounded_size, prepare_image, PreparedImage};
pub use openai::VisionAnalyzer;
pub use prompts::analysis_prompt;
pub use retry::{sleep_or_cancel, RetryPolicy};
pub use sanitize::{finalize, sanitize, RawAnalysis};
pub use scorer::{score_categories, score_text, CategoryScore};
pub use vision::ItemAnalyzer;
