use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use taboo_types::GameState;
use tracing::debug;

use crate::entities::{game_snapshots, prelude::*};

/// Durable store for serialized game state, one row per session key.
#[derive(Clone)]
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn save_snapshot(&self, key: &str, state: &GameState) -> Result<()> {
        let bytes = taboo_core::serialize_snapshot(state)?;
        let payload = String::from_utf8(bytes).context("snapshot is not valid UTF-8")?;

        let model = game_snapshots::ActiveModel {
            id: ActiveValue::Set(key.to_string()),
            payload: ActiveValue::Set(payload),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        GameSnapshots::insert(model)
            .on_conflict(
                OnConflict::column(game_snapshots::Column::Id)
                    .update_columns([
                        game_snapshots::Column::Payload,
                        game_snapshots::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!(key, status = ?state.status, "Saved game snapshot");
        Ok(())
    }

    pub async fn load_snapshot(&self, key: &str) -> Result<Option<GameState>> {
        let Some(model) = GameSnapshots::find_by_id(key.to_string()).one(&self.db).await? else {
            return Ok(None);
        };

        let state = taboo_core::deserialize_snapshot(model.payload.as_bytes())
            .with_context(|| format!("corrupt snapshot for session {key}"))?;
        Ok(Some(state))
    }

    pub async fn delete_snapshot(&self, key: &str) -> Result<bool> {
        let result = GameSnapshots::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
