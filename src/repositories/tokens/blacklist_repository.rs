//! 액세스 토큰 블랙리스트
//!
//! MongoDB 행이 기준 데이터이고, Redis 키(`blacklist:{hash}`)는 토큰 만료까지의
//! TTL로 두는 빠른 경로입니다. Redis에 없거나 Redis가 실패하면 MongoDB를 조회합니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{bson::{doc, DateTime}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::errors::AppResult,
    core::registry::Repository,
    db::{is_duplicate_key, Database},
    domain::entities::tokens::TokenBlacklist,
    services::auth::token_service::RevokedTokenLookup,
};

#[repository(name = "blacklist", collection = "token_blacklist")]
pub struct BlacklistRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl BlacklistRepository {
    /// 이미 등록된 해시면 조용히 성공합니다.
    pub async fn add(&self, entry: &TokenBlacklist, ttl_seconds: u64) -> AppResult<()> {
        match self.collection::<TokenBlacklist>().insert_one(entry).await {
            Ok(_) => {}
            Err(e) if is_duplicate_key(&e) => {
                log::debug!("이미 블랙리스트에 있는 토큰입니다: user_id={}", entry.user_id);
            }
            Err(e) => return Err(e.into()),
        }

        if ttl_seconds > 0 {
            self.redis
                .set_or_warn(&self.cache_key(&entry.token_hash), &entry.user_id, ttl_seconds)
                .await;
        }
        Ok(())
    }

    pub async fn contains(&self, token_hash: &str, now: DateTime) -> AppResult<bool> {
        match self.redis.exists(&self.cache_key(token_hash)).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => log::warn!("블랙리스트 캐시 조회 실패, DB로 확인합니다: {}", e),
        }

        let found = self.collection::<TokenBlacklist>()
            .find_one(doc! { "token_hash": token_hash, "expires_at": { "$gt": now } })
            .await?;
        Ok(found.is_some())
    }

    pub async fn delete_expired(&self, now: DateTime) -> AppResult<u64> {
        let result = self.collection::<TokenBlacklist>()
            .delete_many(doc! { "expires_at": { "$lt": now } })
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

        let expiry_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(IndexOptions::builder()
                .name("expires_at".to_string())
                .build())
            .build();

        self.collection::<TokenBlacklist>()
            .create_indexes([hash_index, expiry_index])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RevokedTokenLookup for BlacklistRepository {
    async fn is_revoked(&self, token_hash: &str) -> AppResult<bool> {
        self.contains(token_hash, DateTime::now()).await
    }
}
