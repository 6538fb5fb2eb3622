//! 사용자 리포지토리
//!
//! ID/이메일 조회 결과를 Redis에 캐시합니다. 저장/삭제 시 두 키를 모두 무효화합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, DateTime}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    config::{AuthProvider, CacheConfig},
    core::errors::{AppError, AppResult, ErrorCode},
    core::registry::Repository,
    db::{is_duplicate_key, parse_object_id, Database},
    domain::entities::users::{AccountStatus, User},
};

#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn email_cache_key(&self, email: &str) -> String {
        self.cache_key(&format!("email:{}", email))
    }

    async fn cache(&self, user: &User) {
        let ttl = CacheConfig::user_ttl_seconds();
        if let Some(id) = user.id_string() {
            self.redis.set_or_warn(&self.cache_key(&id), user, ttl).await;
        }
        self.redis.set_or_warn(&self.email_cache_key(&user.email), user, ttl).await;
    }

    fn cache_keys(&self, user: &User) -> Vec<String> {
        let mut keys = vec![self.email_cache_key(&user.email)];
        if let Some(id) = user.id_string() {
            keys.push(self.cache_key(&id));
        }
        keys
    }

    async fn evict(&self, user: &User) {
        self.redis.del_multiple_or_warn(&self.cache_keys(user)).await;
    }

    fn map_duplicate(e: mongodb::error::Error) -> AppError {
        if is_duplicate_key(&e) {
            // email, nickname 인덱스 중 어느 쪽인지는 메시지로만 구분됩니다.
            if e.to_string().contains("nickname") {
                ErrorCode::NicknameAlreadyExists.error()
            } else {
                ErrorCode::EmailAlreadyExists.error()
            }
        } else {
            AppError::from(e)
        }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;

        if let Some(cached) = self.redis.get_or_warn::<User>(&self.cache_key(id)).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await?;

        if let Some(ref user) = user {
            self.cache(user).await;
        }

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        if let Some(cached) = self.redis.get_or_warn::<User>(&self.email_cache_key(email)).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "email": email })
            .await?;

        if let Some(ref user) = user {
            self.cache(user).await;
        }

        Ok(user)
    }

    pub async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>> {
        Ok(self.collection::<User>()
            .find_one(doc! { "nickname": nickname })
            .await?)
    }

    pub async fn find_by_provider(&self, provider: AuthProvider, provider_id: &str) -> AppResult<Option<User>> {
        Ok(self.collection::<User>()
            .find_one(doc! { "auth_provider": provider.as_str(), "provider_id": provider_id })
            .await?)
    }

    /// 멤버 목록 표시용 일괄 조회 (캐시 미사용)
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        let object_ids = ids
            .iter()
            .filter_map(|id| mongodb::bson::oid::ObjectId::parse_str(id).ok())
            .collect::<Vec<_>>();

        let cursor = self.collection::<User>()
            .find(doc! { "_id": { "$in": object_ids } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection::<User>()
            .insert_one(&user)
            .await
            .map_err(Self::map_duplicate)?;

        user.id = result.inserted_id.as_object_id();
        if user.id.is_none() {
            return Err(AppError::InternalError("삽입된 사용자 ID를 읽을 수 없습니다".to_string()));
        }

        Ok(user)
    }

    /// 엔티티 전체를 덮어씁니다. 상태 전이 후 호출합니다.
    pub async fn save(&self, user: &User) -> AppResult<()> {
        let object_id = user.id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        self.collection::<User>()
            .replace_one(doc! { "_id": object_id }, user)
            .await
            .map_err(Self::map_duplicate)?;

        self.evict(user).await;
        Ok(())
    }

    pub async fn delete(&self, user: &User) -> AppResult<bool> {
        let Some(object_id) = user.id else {
            return Ok(false);
        };

        let result = self.collection::<User>()
            .delete_one(doc! { "_id": object_id })
            .await?;

        self.evict(user).await;
        Ok(result.deleted_count > 0)
    }

    /// 휴면 전환 대상: ACTIVE이면서 마지막 로그인(없으면 가입 시각)이 `cutoff` 이전
    pub async fn find_dormant_candidates(&self, cutoff: DateTime) -> AppResult<Vec<User>> {
        let cursor = self.collection::<User>()
            .find(doc! {
                "status": AccountStatus::Active.as_str(),
                "$or": [
                    { "last_login_at": { "$lt": cutoff } },
                    { "last_login_at": { "$exists": false }, "created_at": { "$lt": cutoff } },
                ],
            })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let collection = self.collection::<User>();

        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        // 닉네임은 설정된 경우에만 유니크
        let nickname_index = IndexModel::builder()
            .keys(doc! { "nickname": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "nickname": { "$type": "string" } })
                .name("nickname_unique".to_string())
                .build())
            .build();

        let provider_index = IndexModel::builder()
            .keys(doc! { "auth_provider": 1, "provider_id": 1 })
            .options(IndexOptions::builder()
                .name("provider_lookup".to_string())
                .build())
            .build();

        let dormancy_index = IndexModel::builder()
            .keys(doc! { "status": 1, "last_login_at": 1 })
            .options(IndexOptions::builder()
                .name("status_last_login".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, nickname_index, provider_index, dormancy_index])
            .await?;

        Ok(())
    }
}
