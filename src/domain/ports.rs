use crate::domain::model::Artifact;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` ends up, for reporting.
    fn location(&self, path: &str) -> String;
}

/// A fetched HTML document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub html: String,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// A generator with validated input: the shape shared by every SEO tool.
pub trait Tool: Validate + Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self) -> Result<Artifact>;
}
