use crate::core::danger::DangerResolver;
use crate::core::grouping::GroupingEngine;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::BulletinPayload;
use crate::domain::vocabulary::Vocabulary;
use crate::render::compass::CompassRose;
use crate::render::document::DocumentRenderer;
use crate::render::RenderedDocument;
use crate::utils::error::{BulletinError, Result};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

pub struct BulletinPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    vocab: Arc<Vocabulary>,
    compass: CompassRose,
}

impl<S: Storage, C: ConfigProvider> BulletinPipeline<S, C> {
    pub fn new(storage: S, config: C, vocab: Arc<Vocabulary>) -> Self {
        let compass = CompassRose::new(vocab.display_aspects());
        Self {
            storage,
            config,
            client: Client::new(),
            vocab,
            compass,
        }
    }

    fn icon_path(&self, file_name: &str) -> String {
        Path::new(self.config.images_dir())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BulletinPipeline<S, C> {
    async fn extract(&self) -> Result<BulletinPayload> {
        let url = self.config.bulletin_url();
        let active_at = self.config.active_at().to_rfc3339();

        tracing::debug!("Requesting bulletin: {} (activeAt={})", url, active_at);
        let response = self
            .client
            .get(&url)
            .query(&[("activeAt", active_at.as_str())])
            .send()
            .await?;

        tracing::debug!("Bulletin response status: {}", response.status());
        // 上游錯誤直接回報，不重試
        let payload: BulletinPayload = response.error_for_status()?.json().await?;

        tracing::debug!("Bulletin payload carries {} features", payload.features.len());
        Ok(payload)
    }

    async fn transform(&self, payload: BulletinPayload) -> Result<RenderedDocument> {
        let region_id = self.config.region_id();
        let (bulletin, region) =
            payload
                .bulletin_for(region_id)
                .ok_or_else(|| BulletinError::RegionNotFound {
                    region_id: region_id.to_string(),
                })?;

        match region.name.as_deref() {
            Some(name) => tracing::info!("Bulletin found for {} ({})", region_id, name),
            None => tracing::info!("Bulletin found for {}", region_id),
        }

        let resolver = DangerResolver::new(&self.vocab);
        let level = resolver.highest_level(region_id, &bulletin.danger_ratings)?;
        let modifier = resolver.subdivision_modifier(&bulletin.danger_ratings);

        let grouped = GroupingEngine::new(&self.vocab, &self.compass).group(&bulletin.avalanche_problems);
        tracing::debug!(
            "Danger level {}{}, {} problems in {} groups",
            level,
            modifier,
            bulletin.avalanche_problems.len(),
            grouped.len()
        );

        let html = DocumentRenderer::new(&self.vocab, self.config.image_href_prefix()).render_page(
            level,
            &modifier,
            &grouped,
            &self.config.active_at(),
        );

        Ok(RenderedDocument {
            region_id: region_id.to_string(),
            level,
            modifier,
            group_count: grouped.len(),
            html,
            icons: grouped.icons,
        })
    }

    async fn load(&self, document: RenderedDocument) -> Result<String> {
        let mut written = 0usize;
        let mut reused = 0usize;

        for icon in &document.icons {
            let path = self.icon_path(&icon.file_name);
            // 檔名由內容雜湊而來，已存在即相同
            if self.storage.exists(&path).await {
                tracing::debug!("Icon already present: {}", path);
                reused += 1;
                continue;
            }
            self.storage.write_file(&path, icon.svg.as_bytes()).await?;
            written += 1;
        }

        let output_path = self.config.output_path().to_string();
        tracing::debug!("Writing HTML ({} bytes) to {}", document.html.len(), output_path);
        self.storage
            .write_file(&output_path, document.html.as_bytes())
            .await?;

        tracing::info!(
            "Icons: {} written, {} reused ({} groups, level {}{})",
            written,
            reused,
            document.group_count,
            document.level,
            document.modifier
        );
        Ok(output_path)
    }
}
