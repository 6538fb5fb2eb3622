use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult, ErrorCode},
    core::registry::Repository,
    db::{is_duplicate_key, Database},
    domain::entities::teams::{TeamMember, TeamRole},
};

fn role_value(role: TeamRole) -> &'static str {
    match role {
        TeamRole::Owner => "OWNER",
        TeamRole::Leader => "LEADER",
        TeamRole::Member => "MEMBER",
    }
}

/// 팀 소속 저장소. (team_id, user_id) 유니크 인덱스로 중복 가입을 막습니다.
#[repository(name = "member", collection = "team_members")]
pub struct MemberRepository {
    db: Arc<Database>,
}

impl MemberRepository {
    pub async fn add(&self, mut member: TeamMember) -> AppResult<TeamMember> {
        let result = self.collection::<TeamMember>()
            .insert_one(&member)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    ErrorCode::AlreadyTeamMember.error()
                } else {
                    AppError::from(e)
                }
            })?;

        member.id = result.inserted_id.as_object_id();
        Ok(member)
    }

    pub async fn find(&self, team_id: &str, user_id: &str) -> AppResult<Option<TeamMember>> {
        Ok(self.collection::<TeamMember>()
            .find_one(doc! { "team_id": team_id, "user_id": user_id })
            .await?)
    }

    /// 가입 순서대로
    pub async fn find_by_team(&self, team_id: &str) -> AppResult<Vec<TeamMember>> {
        let cursor = self.collection::<TeamMember>()
            .find(doc! { "team_id": team_id })
            .sort(doc! { "joined_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TeamMember>> {
        let cursor = self.collection::<TeamMember>()
            .find(doc! { "user_id": user_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update_role(&self, team_id: &str, user_id: &str, role: TeamRole) -> AppResult<bool> {
        let result = self.collection::<TeamMember>()
            .update_one(
                doc! { "team_id": team_id, "user_id": user_id },
                doc! { "$set": { "role": role_value(role) } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn remove(&self, team_id: &str, user_id: &str) -> AppResult<bool> {
        let result = self.collection::<TeamMember>()
            .delete_one(doc! { "team_id": team_id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_by_team(&self, team_id: &str) -> AppResult<u64> {
        let result = self.collection::<TeamMember>()
            .delete_many(doc! { "team_id": team_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let membership_index = IndexModel::builder()
            .keys(doc! { "team_id": 1, "user_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("team_user_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder()
                .name("user_id".to_string())
                .build())
            .build();

        self.collection::<TeamMember>()
            .create_indexes([membership_index, user_index])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_value_matches_serde() {
        for role in [TeamRole::Owner, TeamRole::Leader, TeamRole::Member] {
            let serialized = serde_json::to_value(role).unwrap();
            assert_eq!(serialized, role_value(role));
        }
    }
}
