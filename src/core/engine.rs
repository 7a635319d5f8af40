use crate::core::sitemap::{merge_entries, parse_sitemap, Sitemap, SITEMAP_FILE_NAME};
use crate::domain::model::Artifact;
use crate::domain::ports::{Storage, Tool};
use crate::utils::error::{Result, SeoError};

/// Runs tools: validate, generate, then hand the artifact to the caller
/// (preview) or to storage (export).
pub struct SeoEngine<S: Storage> {
    storage: S,
}

impl<S: Storage> SeoEngine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn preview(&self, tool: &dyn Tool) -> Result<Artifact> {
        tracing::debug!("Validating {} input", tool.name());
        if let Err(e) = tool.validate() {
            tracing::warn!("{} input rejected: {}", tool.name(), e);
            return Err(e);
        }

        let artifact = tool.generate()?;
        tracing::debug!(
            "Generated {} ({} bytes)",
            artifact.file_name,
            artifact.content.len()
        );
        Ok(artifact)
    }

    pub async fn export(&self, tool: &dyn Tool) -> Result<String> {
        let artifact = self.preview(tool)?;
        self.export_artifact(&artifact).await
    }

    /// Writes an artifact that was generated elsewhere, e.g. an audit report.
    pub async fn export_artifact(&self, artifact: &Artifact) -> Result<String> {
        self.storage
            .write_file(&artifact.file_name, artifact.content.as_bytes())
            .await?;
        let location = self.storage.location(&artifact.file_name);
        tracing::info!("💾 Saved {} to {}", artifact.mime_type, location);
        Ok(location)
    }

    /// Merges `sitemap` into the sitemap.xml already in storage, if any.
    pub async fn merge_sitemap(&self, sitemap: Sitemap) -> Result<Sitemap> {
        let existing = match self.storage.read_file(SITEMAP_FILE_NAME).await {
            Ok(bytes) => parse_sitemap(&String::from_utf8_lossy(&bytes))?,
            Err(SeoError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No existing sitemap found, starting a new one");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        tracing::info!(
            "Merging {} entries into {} existing entries",
            sitemap.entries.len(),
            existing.len()
        );

        let entries = merge_entries(existing, sitemap.entries, &sitemap.base_url);
        Ok(Sitemap::new(sitemap.base_url, entries))
    }

    /// Exports every tool in order and stops at the first failure.
    pub async fn export_all(&self, tools: &[&dyn Tool]) -> Result<Vec<String>> {
        tracing::info!("🚀 Exporting {} SEO artifacts", tools.len());
        let mut locations = Vec::with_capacity(tools.len());
        for tool in tools {
            locations.push(self.export(*tool).await?);
        }
        tracing::info!("✅ Exported {} artifacts", locations.len());
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RobotsRule, SeoMetadata};
    use crate::core::robots::RobotsFile;
    use crate::domain::model::SitemapEntry;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| {
                    SeoError::IoError(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        path.to_string(),
                    ))
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("memory://{}", path)
        }
    }

    #[test]
    fn test_preview_rejects_invalid_input() {
        let engine = SeoEngine::new(MemoryStorage::default());
        let err = engine.preview(&SeoMetadata::default()).unwrap_err();
        assert!(matches!(err, SeoError::ValidationError { ref errors } if errors.len() == 2));
    }

    #[tokio::test]
    async fn test_export_writes_through_storage() {
        let engine = SeoEngine::new(MemoryStorage::default());
        let robots = RobotsFile::new(vec![RobotsRule::for_agent("*")], None);

        let location = engine.export(&robots).await.unwrap();
        assert_eq!(location, "memory://robots.txt");

        let saved = engine.storage().read_file("robots.txt").await.unwrap();
        assert_eq!(String::from_utf8(saved).unwrap(), "User-agent: *\n");
    }

    #[tokio::test]
    async fn test_merge_sitemap_without_existing_file() {
        let engine = SeoEngine::new(MemoryStorage::default());
        let sitemap = Sitemap::new("https://x.com", vec![SitemapEntry::new("/")]);

        let merged = engine.merge_sitemap(sitemap).await.unwrap();
        assert_eq!(merged.entries.len(), 1);
        assert_eq!(merged.entries[0].url, "https://x.com/");
    }

    #[tokio::test]
    async fn test_merge_sitemap_keeps_existing_entries() {
        let engine = SeoEngine::new(MemoryStorage::default());
        let existing = Sitemap::new("https://x.com", vec![SitemapEntry::new("/alt")]);
        engine.export(&existing).await.unwrap();

        let merged = engine
            .merge_sitemap(Sitemap::new("https://x.com", vec![SitemapEntry::new("/neu")]))
            .await
            .unwrap();
        let urls: Vec<&str> = merged.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.com/alt", "https://x.com/neu"]);
    }

    #[tokio::test]
    async fn test_export_all_stops_at_first_invalid_tool() {
        let engine = SeoEngine::new(MemoryStorage::default());
        let robots = RobotsFile::new(vec![RobotsRule::for_agent("*")], None);
        let metadata = SeoMetadata::default();

        let result = engine.export_all(&[&robots, &metadata]).await;
        assert!(result.is_err());
        assert!(engine.storage().read_file("robots.txt").await.is_ok());
        assert!(engine.storage().read_file("meta-tags.html").await.is_err());
    }
}
