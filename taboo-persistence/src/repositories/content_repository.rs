use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use taboo_types::ContentSet;

use crate::entities::{content_cache, prelude::*};

const CACHE_KEY: &str = "content";

/// Content as last fetched from the remote feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedContent {
    pub version: i32,
    pub content: ContentSet,
    pub fetched_at: DateTime<Utc>,
}

impl CachedContent {
    pub fn is_older_than(&self, max_age: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.fetched_at > max_age
    }
}

/// Offline copy of the card and prenda feed.
#[derive(Clone)]
pub struct ContentRepository {
    db: DatabaseConnection,
}

impl ContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn load(&self) -> Result<Option<CachedContent>> {
        let Some(model) = ContentCache::find_by_id(CACHE_KEY.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(CachedContent {
            version: model.version,
            content: ContentSet::new(
                serde_json::from_str(&model.cards)?,
                serde_json::from_str(&model.prendas)?,
            ),
            fetched_at: model.fetched_at.with_timezone(&Utc),
        }))
    }

    pub async fn store(&self, version: i32, content: &ContentSet) -> Result<CachedContent> {
        let fetched_at = Utc::now();
        let model = content_cache::ActiveModel {
            id: ActiveValue::Set(CACHE_KEY.to_string()),
            version: ActiveValue::Set(version),
            cards: ActiveValue::Set(serde_json::to_string(&content.cards)?),
            prendas: ActiveValue::Set(serde_json::to_string(&content.prendas)?),
            fetched_at: ActiveValue::Set(fetched_at.into()),
        };

        ContentCache::insert(model)
            .on_conflict(
                OnConflict::column(content_cache::Column::Id)
                    .update_columns([
                        content_cache::Column::Version,
                        content_cache::Column::Cards,
                        content_cache::Column::Prendas,
                        content_cache::Column::FetchedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(CachedContent {
            version,
            content: content.clone(),
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use taboo_types::{Card, Intensity, Prenda, PrendaKind};

    async fn setup_test_db() -> ContentRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ContentRepository::new(db)
    }

    fn sample_content() -> ContentSet {
        ContentSet::new(
            vec![Card::new("1", "Volcán", &["lava", "montaña", "erupción", "fuego", "ceniza"])],
            vec![Prenda {
                id: "p1".to_string(),
                description: "Habla como robot".to_string(),
                kind: PrendaKind::Individual,
                intensity: Intensity::Fun,
            }],
        )
    }

    #[tokio::test]
    async fn test_empty_cache() {
        let repo = setup_test_db().await;
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let repo = setup_test_db().await;

        repo.store(3, &sample_content()).await.unwrap();
        let cached = repo.load().await.unwrap().unwrap();

        assert_eq!(cached.version, 3);
        assert_eq!(cached.content, sample_content());
    }

    #[tokio::test]
    async fn test_store_replaces_previous_version() {
        let repo = setup_test_db().await;

        repo.store(1, &ContentSet::default()).await.unwrap();
        repo.store(2, &sample_content()).await.unwrap();

        let cached = repo.load().await.unwrap().unwrap();
        assert_eq!(cached.version, 2);
        assert_eq!(cached.content.cards.len(), 1);
    }

    #[test]
    fn test_cache_age() {
        let now = Utc::now();
        let cached = CachedContent {
            version: 1,
            content: ContentSet::default(),
            fetched_at: now - chrono::Duration::days(8),
        };
        assert!(cached.is_older_than(chrono::Duration::days(7), now));
        assert!(!cached.is_older_than(chrono::Duration::days(9), now));
    }
}
