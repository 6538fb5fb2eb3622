use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult},
    core::registry::Repository,
    db::{parse_object_id, Database},
    domain::entities::scrims::Scrim,
};

#[repository(name = "scrim", collection = "scrims")]
pub struct ScrimRepository {
    db: Arc<Database>,
}

impl ScrimRepository {
    pub async fn create(&self, mut scrim: Scrim) -> AppResult<Scrim> {
        let result = self.collection::<Scrim>()
            .insert_one(&scrim)
            .await?;

        scrim.id = result.inserted_id.as_object_id();
        Ok(scrim)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Scrim>> {
        let object_id = parse_object_id(id)?;
        Ok(self.collection::<Scrim>()
            .find_one(doc! { "_id": object_id })
            .await?)
    }

    /// 팀이 참가한 스크림 (예정 시각 내림차순)
    pub async fn find_by_team(&self, team_id: &str) -> AppResult<Vec<Scrim>> {
        let cursor = self.collection::<Scrim>()
            .find(doc! { "participant_team_ids": team_id })
            .sort(doc! { "scheduled_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn save(&self, scrim: &Scrim) -> AppResult<()> {
        let object_id = scrim.id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 스크림입니다".to_string()))?;

        self.collection::<Scrim>()
            .replace_one(doc! { "_id": object_id }, scrim)
            .await?;
        Ok(())
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let participant_index = IndexModel::builder()
            .keys(doc! { "participant_team_ids": 1, "scheduled_at": -1 })
            .options(IndexOptions::builder()
                .name("participant_scheduled".to_string())
                .build())
            .build();

        self.collection::<Scrim>()
            .create_indexes([participant_index])
            .await?;
        Ok(())
    }
}
