//! # Redis 캐시 클라이언트
//!
//! 값은 모두 JSON 문자열로 저장합니다. 팀 상세, 스크림 순위표, 사용자 조회 결과의
//! TTL 캐시와 토큰 블랙리스트 빠른 경로, OAuth state 보관에 사용됩니다.
//!
//! 캐시는 보조 수단입니다. 호출자는 캐시 실패를 로그만 남기고 무시해야 하며,
//! [`RedisClient::get_or_warn`] 같은 헬퍼가 그 규칙을 한 곳에 모읍니다.
//!
//! ```text
//! team:{id}                  팀 상세 (CACHE_TEAM_TTL_SECONDS)
//! scrim:standings:{id}       스크림 순위표 (CACHE_STANDINGS_TTL_SECONDS)
//! user:{id}, user:email:{e}  사용자 (CACHE_USER_TTL_SECONDS)
//! blacklist:{sha256}         폐기된 액세스 토큰 (토큰 만료까지)
//! oauth_state:{state}        OAuth state (600초, 1회용)
//! ```

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::RedisConfig;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn serde_failure(what: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, what, e.to_string()))
}

impl RedisClient {
    /// 설정된 URL로 연결하고 `PING`으로 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::open(RedisConfig::url())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| serde_failure("Deserialization failed", e)))
            .transpose()
    }

    /// 캐시 조회. 실패하면 경고만 남기고 미스로 취급합니다.
    pub async fn get_or_warn<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("캐시 조회 실패 ({}): {}", key, e);
                None
            }
        }
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_failure("Serialization failed", e))?;
        conn.set_ex(key, json, seconds).await
    }

    /// 캐시 저장. 실패하면 경고만 남깁니다.
    pub async fn set_or_warn<T: Serialize>(&self, key: &str, value: &T, seconds: u64) {
        if let Err(e) = self.set_with_expiry(key, value, seconds).await {
            log::warn!("캐시 저장 실패 ({}): {}", key, e);
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.exists(key).await
    }

    /// 값을 읽고 즉시 삭제합니다 (1회용 값).
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get_del(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| serde_failure("Deserialization failed", e)))
            .transpose()
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// 캐시 무효화. 실패하면 경고만 남깁니다.
    pub async fn del_or_warn(&self, key: &str) {
        if let Err(e) = self.del(key).await {
            log::warn!("캐시 무효화 실패 ({}): {}", key, e);
        }
    }

    /// 여러 키를 한 번의 `DEL`로 삭제합니다. 빈 슬라이스는 즉시 성공합니다.
    ///
    /// `#[repository]`가 생성하는 캐시 무효화 코드도 이 메서드를 호출합니다.
    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// 패턴에 맞는 키 목록. `#[repository]`가 생성하는 캐시 무효화 코드가 호출합니다.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }

    pub async fn del_multiple_or_warn(&self, keys: &[String]) {
        if let Err(e) = self.del_multiple(keys).await {
            log::warn!("캐시 무효화 실패 ({}): {}", keys.join(", "), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> RedisClient {
        RedisClient {
            client: Client::open("redis://127.0.0.1:1/").unwrap(),
        }
    }

    #[actix_web::test]
    async fn test_del_multiple_with_no_keys_skips_connection() {
        let redis = unreachable_client();

        assert!(redis.del_multiple(&[]).await.is_ok());
    }

    #[actix_web::test]
    async fn test_del_multiple_or_warn_swallows_connection_error() {
        let redis = unreachable_client();

        assert!(redis.del_multiple(&["user:1".to_string()]).await.is_err());
        redis.del_multiple_or_warn(&["user:1".to_string()]).await;
    }
}
