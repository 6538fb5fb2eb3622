use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult, ErrorCode},
    core::registry::Repository,
    db::{is_duplicate_key, parse_object_id, Database},
    domain::entities::teams::Team,
};

#[repository(name = "team", collection = "teams")]
pub struct TeamRepository {
    db: Arc<Database>,
}

impl TeamRepository {
    fn map_duplicate(e: mongodb::error::Error) -> AppError {
        if is_duplicate_key(&e) {
            ErrorCode::TeamNameAlreadyExists.error()
        } else {
            AppError::from(e)
        }
    }

    pub async fn create(&self, mut team: Team) -> AppResult<Team> {
        let result = self.collection::<Team>()
            .insert_one(&team)
            .await
            .map_err(Self::map_duplicate)?;

        team.id = result.inserted_id.as_object_id();
        Ok(team)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Team>> {
        let object_id = parse_object_id(id)?;
        Ok(self.collection::<Team>()
            .find_one(doc! { "_id": object_id })
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Team>> {
        Ok(self.collection::<Team>()
            .find_one(doc! { "name": name })
            .await?)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Team>> {
        let object_ids = ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect::<Vec<_>>();

        let cursor = self.collection::<Team>()
            .find(doc! { "_id": { "$in": object_ids } })
            .sort(doc! { "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn save(&self, team: &Team) -> AppResult<()> {
        let object_id = team.id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 팀입니다".to_string()))?;

        self.collection::<Team>()
            .replace_one(doc! { "_id": object_id }, team)
            .await
            .map_err(Self::map_duplicate)?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let object_id = parse_object_id(id)?;
        let result = self.collection::<Team>()
            .delete_one(doc! { "_id": object_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        self.collection::<Team>()
            .create_indexes([name_index])
            .await?;
        Ok(())
    }
}
