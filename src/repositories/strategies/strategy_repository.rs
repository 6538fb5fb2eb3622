use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult},
    core::registry::Repository,
    db::{parse_object_id, Database},
    domain::entities::strategies::Strategy,
};

#[repository(name = "strategy", collection = "strategies")]
pub struct StrategyRepository {
    db: Arc<Database>,
}

impl StrategyRepository {
    pub async fn create(&self, mut strategy: Strategy) -> AppResult<Strategy> {
        let result = self.collection::<Strategy>()
            .insert_one(&strategy)
            .await?;

        strategy.id = result.inserted_id.as_object_id();
        Ok(strategy)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Strategy>> {
        let object_id = parse_object_id(id)?;
        Ok(self.collection::<Strategy>()
            .find_one(doc! { "_id": object_id })
            .await?)
    }

    pub async fn find_by_team(&self, team_id: &str) -> AppResult<Vec<Strategy>> {
        let cursor = self.collection::<Strategy>()
            .find(doc! { "team_id": team_id })
            .sort(doc! { "updated_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn save(&self, strategy: &Strategy) -> AppResult<()> {
        let object_id = strategy.id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 전략입니다".to_string()))?;

        self.collection::<Strategy>()
            .replace_one(doc! { "_id": object_id }, strategy)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let object_id = parse_object_id(id)?;
        let result = self.collection::<Strategy>()
            .delete_one(doc! { "_id": object_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_by_team(&self, team_id: &str) -> AppResult<u64> {
        let result = self.collection::<Strategy>()
            .delete_many(doc! { "team_id": team_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let team_index = IndexModel::builder()
            .keys(doc! { "team_id": 1, "updated_at": -1 })
            .options(IndexOptions::builder()
                .name("team_updated".to_string())
                .build())
            .build();

        self.collection::<Strategy>()
            .create_indexes([team_index])
            .await?;
        Ok(())
    }
}
