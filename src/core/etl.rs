use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting bulletin render...");

        // Extract
        let payload = self.pipeline.extract().await?;
        tracing::info!("📥 Fetched bulletin with {} features", payload.features.len());

        // Transform
        let document = self.pipeline.transform(payload).await?;
        tracing::info!(
            "🔄 Rendered {} (level {}{}, {} groups, {} icons)",
            document.region_id,
            document.level,
            document.modifier,
            document.group_count,
            document.icons.len()
        );

        // Load
        let output_path = self.pipeline.load(document).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
