use crate::domain::model::BulletinPayload;
use crate::render::RenderedDocument;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn lang(&self) -> &str;
    fn region_id(&self) -> &str;
    fn active_at(&self) -> DateTime<FixedOffset>;
    fn output_path(&self) -> &str;
    fn images_dir(&self) -> &str;
    fn image_href_prefix(&self) -> &str;

    /// `{endpoint}/{lang}/geojson`
    fn bulletin_url(&self) -> String {
        format!("{}/{}/geojson", self.api_endpoint().trim_end_matches('/'), self.lang())
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<BulletinPayload>;
    async fn transform(&self, payload: BulletinPayload) -> Result<RenderedDocument>;
    async fn load(&self, document: RenderedDocument) -> Result<String>;
}
