//! OpenAI-compatible vision backend.
//!
//! Works with any endpoint exposing `/chat/completions` with image inputs:
//! OpenAI itself, OpenRouter, vLLM, LocalAI or Ollama in compatibility mode.
//!
//! # Example
//!
//! ```rust,no_run
//! use voisinage_inference::openai::VisionAnalyzer;
//! use voisinage_inference::ItemAnalyzer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let analyzer = VisionAnalyzer::from_env().unwrap();
//!     let photo = std::fs::read("drill.jpg").unwrap();
//!     let result = analyzer.analyze_image(&photo).await.unwrap();
//!     println!("{} ({})", result.title, result.category);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::VisionAnalyzer;
pub use error::{error_message, to_voisinage_error, OpenAIErrorCode};
pub use types::*;
