//! 리프레시 토큰 저장소
//!
//! 토큰 원문 대신 SHA-256 해시를 저장합니다. 회전 시 `revoke()`가 조건부 갱신으로
//! 동작하므로 같은 리프레시 토큰을 두 번 사용해도 한 번만 성공합니다.

use std::sync::Arc;
use mongodb::{bson::{doc, DateTime}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::AppResult,
    core::registry::Repository,
    db::Database,
    domain::entities::tokens::RefreshToken,
};

#[repository(name = "token", collection = "refresh_tokens")]
pub struct TokenRepository {
    db: Arc<Database>,
}

impl TokenRepository {
    pub async fn insert(&self, token: &RefreshToken) -> AppResult<()> {
        self.collection::<RefreshToken>()
            .insert_one(token)
            .await?;
        Ok(())
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.collection::<RefreshToken>()
            .find_one(doc! { "token_hash": token_hash })
            .await?)
    }

    /// 아직 폐기되지 않은 경우에만 폐기하고 `true`를 돌려줍니다.
    pub async fn revoke(&self, token_hash: &str) -> AppResult<bool> {
        let result = self.collection::<RefreshToken>()
            .update_one(
                doc! { "token_hash": token_hash, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    pub async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64> {
        let result = self.collection::<RefreshToken>()
            .update_many(
                doc! { "user_id": user_id, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;

        log::debug!("사용자 {}의 리프레시 토큰 {}개 폐기", user_id, result.modified_count);
        Ok(result.modified_count)
    }

    /// 만료되었거나 폐기된 행 정리
    pub async fn delete_expired_or_revoked(&self, now: DateTime) -> AppResult<u64> {
        let result = self.collection::<RefreshToken>()
            .delete_many(doc! {
                "$or": [
                    { "expires_at": { "$lt": now } },
                    { "revoked": true },
                ]
            })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let hash_index = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("token_hash_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder()
                .name("user_id".to_string())
                .build())
            .build();

        self.collection::<RefreshToken>()
            .create_indexes([hash_index, user_index])
            .await?;
        Ok(())
    }
}
