//! Where cards and prendas come from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use taboo_persistence::ContentRepository;
use taboo_types::{Card, ContentSet, Prenda};
use tracing::{debug, info, warn};

#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn load(&self) -> Result<ContentSet>;
}

/// Runs `provider`, degrading any failure to an empty content set.
pub async fn load_or_empty(provider: &dyn ContentProvider) -> ContentSet {
    match provider.load().await {
        Ok(content) => content,
        Err(e) => {
            warn!("Content load failed, continuing without content: {:#}", e);
            ContentSet::default()
        }
    }
}

pub struct StaticContentProvider {
    content: ContentSet,
}

impl StaticContentProvider {
    pub fn new(content: ContentSet) -> Self {
        Self { content }
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    async fn load(&self) -> Result<ContentSet> {
        Ok(self.content.clone())
    }
}

/// Reads `cards.json` and, when present, `prendas.json` from a directory.
pub struct DirectoryContentProvider {
    directory: PathBuf,
}

impl DirectoryContentProvider {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ContentProvider for DirectoryContentProvider {
    async fn load(&self) -> Result<ContentSet> {
        let cards_path = self.directory.join("cards.json");
        let raw = tokio::fs::read_to_string(&cards_path)
            .await
            .with_context(|| format!("reading {}", cards_path.display()))?;
        let cards: Vec<Card> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", cards_path.display()))?;

        let prendas_path = self.directory.join("prendas.json");
        let prendas: Vec<Prenda> = if tokio::fs::try_exists(&prendas_path).await? {
            let raw = tokio::fs::read_to_string(&prendas_path).await?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", prendas_path.display()))?
        } else {
            debug!("No prendas file in {}", self.directory.display());
            Vec::new()
        };

        info!(
            "Loaded {} cards and {} prendas from {}",
            cards.len(),
            prendas.len(),
            self.directory.display()
        );
        Ok(ContentSet::new(cards, prendas))
    }
}

#[derive(Debug, Deserialize)]
struct VersionData {
    version: i32,
}

/// Fetches the content feed over HTTP and keeps an offline copy.
///
/// The feed is refetched when `version.json` reports a newer version than
/// the cached one or the cache is older than `max_age`. Any fetch failure
/// falls back to the cache.
pub struct RemoteContentProvider {
    client: Client,
    base_url: String,
    cache: ContentRepository,
    max_age: chrono::Duration,
}

impl RemoteContentProvider {
    pub fn new(base_url: impl Into<String>, cache: ContentRepository, max_age_days: i64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
            max_age: chrono::Duration::days(max_age_days),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, file);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("{} returned status {}", url, response.status()));
        }

        response
            .json()
            .await
            .with_context(|| format!("parsing {url}"))
    }

    async fn refresh(&self) -> Result<ContentSet> {
        let remote: VersionData = self.fetch_json("version.json").await?;
        let cached = self.cache.load().await.unwrap_or_else(|e| {
            warn!("Content cache unreadable: {:#}", e);
            None
        });

        if let Some(cached) = cached {
            let is_new_version = cached.version < remote.version;
            let is_expired = cached.is_older_than(self.max_age, chrono::Utc::now());
            if !is_new_version && !is_expired {
                debug!("Content is up to date at version {}", cached.version);
                return Ok(cached.content);
            }
            info!(
                is_new_version,
                is_expired, "Content update detected, fetching version {}", remote.version
            );
        }

        let cards: Vec<Card> = self.fetch_json("cards.json").await?;
        let prendas: Vec<Prenda> = self.fetch_json("prendas.json").await?;
        let stored = self
            .cache
            .store(remote.version, &ContentSet::new(cards, prendas))
            .await?;
        Ok(stored.content)
    }
}

#[async_trait]
impl ContentProvider for RemoteContentProvider {
    async fn load(&self) -> Result<ContentSet> {
        match self.refresh().await {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!("Failed to update content, falling back to cache: {:#}", e);
                Ok(self
                    .cache
                    .load()
                    .await?
                    .map(|cached| cached.content)
                    .unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl ContentProvider for FailingProvider {
        async fn load(&self) -> Result<ContentSet> {
            Err(anyhow!("feed unavailable"))
        }
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let content = load_or_empty(&FailingProvider).await;
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn test_directory_provider_reads_feed_files() {
        let dir = std::env::temp_dir().join(format!("taboo-content-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("cards.json"),
            r#"[{"id":"1","word":"Reloj","forbiddenWords":["hora","tiempo","aguja","pulsera","tic"],"difficulty":"easy"}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            dir.join("prendas.json"),
            r#"[{"id":"p1","description":"Haz diez sentadillas","type":"individual","intensity":"hard"}]"#,
        )
        .await
        .unwrap();

        let content = DirectoryContentProvider::new(&dir).load().await.unwrap();
        assert_eq!(content.cards.len(), 1);
        assert_eq!(content.cards[0].forbidden_words.len(), 5);
        assert_eq!(content.prendas.len(), 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_directory_provider_without_prendas() {
        let dir = std::env::temp_dir().join(format!("taboo-content-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("cards.json"), "[]").await.unwrap();

        let content = DirectoryContentProvider::new(&dir).load().await.unwrap();
        assert!(content.is_empty());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let provider = DirectoryContentProvider::new("/nonexistent/taboo/content");
        assert!(provider.load().await.is_err());
    }
}
