//! Analyzer trait for item photos.

use async_trait::async_trait;

use voisinage_core::{AIAnalysisResult, Cancellation, Result};

/// Backend that turns an item photo into a structured listing draft.
///
/// The fused category, its confidence, alternatives and suggestions are
/// attached to every successful result.
#[async_trait]
pub trait ItemAnalyzer: Send + Sync {
    /// Analyze raw image bytes (any common format).
    async fn analyze_image(&self, image: &[u8]) -> Result<AIAnalysisResult> {
        self.analyze_image_with_cancel(image, &Cancellation::never())
            .await
    }

    /// Analyze, abandoning with `Error::Cancelled` once `cancel` fires.
    async fn analyze_image_with_cancel(
        &self,
        image: &[u8],
        cancel: &Cancellation,
    ) -> Result<AIAnalysisResult>;

    /// Check if the analysis service is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
