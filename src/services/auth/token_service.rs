//! # JWT 발급과 검증
//!
//! HS256 대칭 키로 액세스/리프레시 토큰을 서명합니다.
//!
//! ```text
//! 검증 순서 (액세스 토큰)
//! 1. 서명 검증 + 파싱          ─ 실패: InvalidSignature / Malformed
//! 2. exp 확인 (leeway 0)       ─ 실패: Expired
//! 3. type == "access"          ─ 실패: WrongType
//! 4. 블랙리스트 조회 (해시)      ─ 실패: TOKEN_REVOKED
//! ```
//!
//! 1~3단계 실패는 로그에 원인을 구분해 남기고, 응답은 모두 `INVALID_TOKEN`으로 통일합니다.
//! 4단계는 [`RevokedTokenLookup`]을 통해 저장소와 분리되어 있습니다.

use std::sync::Arc;
use async_trait::async_trait;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::DateTime;
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use singleton_macro::service;
use thiserror::Error;

use crate::{
    config::JwtConfig,
    core::errors::{AppError, AppResult, ErrorCode},
    domain::entities::tokens::{BlacklistReason, RefreshToken, TokenBlacklist},
    domain::entities::users::User,
    domain::models::auth::AuthenticatedUser,
    domain::models::token::{TokenClaims, TokenPair, TokenType},
    repositories::tokens::{BlacklistRepository, TokenRepository},
    utils::time::from_unix_seconds,
};

/// 토큰 검증 실패 원인
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("JWT 서명이 일치하지 않습니다")]
    InvalidSignature,

    #[error("JWT 형식이 올바르지 않습니다: {0}")]
    Malformed(String),

    #[error("JWT가 만료되었습니다")]
    Expired,

    #[error("토큰 용도가 다릅니다 (기대: {expected}, 실제: {actual})")]
    WrongType { expected: &'static str, actual: &'static str },
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        ErrorCode::InvalidToken.error()
    }
}

/// 토큰 원문의 SHA-256 (소문자 hex)
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// 폐기된 액세스 토큰 조회
#[async_trait]
pub trait RevokedTokenLookup: Send + Sync {
    async fn is_revoked(&self, token_hash: &str) -> AppResult<bool>;
}

/// 서명/검증만 담당하는 순수 코덱
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtCodec {
    pub fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            &JwtConfig::secret(),
            JwtConfig::access_expiration_minutes() * 60,
            JwtConfig::refresh_expiration_days() * 24 * 60 * 60,
        )
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    fn claims(&self, user_id: &str, email: Option<&str>, token_type: TokenType, issued_at: i64) -> TokenClaims {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_seconds,
            TokenType::Refresh => self.refresh_ttl_seconds,
        };

        TokenClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            token_type,
            iat: issued_at,
            exp: issued_at + ttl,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn sign(&self, claims: &TokenClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    pub fn issue_access(&self, user_id: &str, email: &str, issued_at: i64) -> AppResult<(String, TokenClaims)> {
        let claims = self.claims(user_id, Some(email), TokenType::Access, issued_at);
        Ok((self.sign(&claims)?, claims))
    }

    pub fn issue_refresh(&self, user_id: &str, issued_at: i64) -> AppResult<(String, TokenClaims)> {
        let claims = self.claims(user_id, None, TokenType::Refresh, issued_at);
        Ok((self.sign(&claims)?, claims))
    }

    pub fn decode(&self, token: &str, expected: TokenType) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.token_type != expected {
            return Err(TokenError::WrongType {
                expected: expected.as_str(),
                actual: claims.token_type.as_str(),
            });
        }

        Ok(claims)
    }

    /// 서명/만료/용도 검증 후 블랙리스트까지 확인합니다.
    pub async fn authenticate(
        &self,
        token: &str,
        revoked: &dyn RevokedTokenLookup,
    ) -> AppResult<AuthenticatedUser> {
        let claims = self.decode(token, TokenType::Access).map_err(|e| {
            log::warn!("액세스 토큰 검증 실패: {}", e);
            AppError::from(e)
        })?;

        if revoked.is_revoked(&hash_token(token)).await? {
            log::warn!("폐기된 액세스 토큰 사용 시도: user_id={}", claims.sub);
            return Err(ErrorCode::TokenRevoked.error());
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            roles: vec!["user".to_string()],
            access_token: token.to_string(),
            expires_at: claims.exp,
        })
    }
}

#[service(name = "token")]
pub struct TokenService {
    token_repo: Arc<TokenRepository>,

    blacklist_repo: Arc<BlacklistRepository>,

    codec: OnceCell<JwtCodec>,
}

impl TokenService {
    fn codec(&self) -> &JwtCodec {
        self.codec.get_or_init(JwtCodec::from_config)
    }

    /// 액세스/리프레시 토큰 쌍을 발급하고 리프레시 토큰 해시를 저장합니다.
    pub async fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let user_id = user.id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let now = chrono::Utc::now().timestamp();

        let (access_token, _) = self.codec().issue_access(&user_id, &user.email, now)?;
        let (refresh_token, refresh_claims) = self.codec().issue_refresh(&user_id, now)?;

        self.token_repo
            .insert(&RefreshToken::new(
                user_id.clone(),
                hash_token(&refresh_token),
                from_unix_seconds(refresh_claims.exp),
            ))
            .await?;

        log::debug!("토큰 발급: user_id={}", user_id);

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.codec().access_ttl_seconds(),
        })
    }

    /// 요청 인증 (미들웨어에서 호출)
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        self.codec().authenticate(token, self.blacklist_repo.as_ref()).await
    }

    /// 리프레시 토큰 회전. 기존 토큰을 폐기하고 사용자 ID를 돌려줍니다.
    ///
    /// 이미 폐기되었거나 만료된 저장 행이면 `INVALID_TOKEN`입니다.
    pub async fn rotate_refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.codec().decode(refresh_token, TokenType::Refresh).map_err(|e| {
            log::warn!("리프레시 토큰 검증 실패: {}", e);
            AppError::from(e)
        })?;

        let token_hash = hash_token(refresh_token);
        let stored = self.token_repo
            .find_by_hash(&token_hash)
            .await?
            .filter(|t| t.user_id == claims.sub && t.is_usable(DateTime::now()));

        if stored.is_none() || !self.token_repo.revoke(&token_hash).await? {
            log::warn!("저장되지 않았거나 이미 사용된 리프레시 토큰: user_id={}", claims.sub);
            return Err(ErrorCode::InvalidToken.error());
        }

        Ok(claims.sub)
    }

    /// 현재 액세스 토큰을 원래 만료 시각까지 블랙리스트에 올립니다.
    pub async fn revoke_access(&self, user: &AuthenticatedUser, reason: BlacklistReason) -> AppResult<()> {
        let ttl = (user.expires_at - chrono::Utc::now().timestamp()).max(0) as u64;
        let entry = TokenBlacklist::new(
            hash_token(&user.access_token),
            user.user_id.clone(),
            reason,
            from_unix_seconds(user.expires_at),
        );

        self.blacklist_repo.add(&entry, ttl).await
    }

    pub async fn revoke_all_refresh(&self, user_id: &str) -> AppResult<u64> {
        self.token_repo.revoke_all_for_user(user_id).await
    }

    /// 정리 작업: 만료된 블랙리스트 행, 만료/폐기된 리프레시 토큰
    pub async fn purge_expired(&self, now: DateTime) -> AppResult<(u64, u64)> {
        let blacklist = self.blacklist_repo.delete_expired(now).await?;
        let refresh = self.token_repo.delete_expired_or_revoked(now).await?;
        Ok((blacklist, refresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use actix_web::ResponseError;

    struct InMemoryBlacklist(Mutex<HashSet<String>>);

    impl InMemoryBlacklist {
        fn new() -> Self {
            Self(Mutex::new(HashSet::new()))
        }

        fn revoke(&self, token: &str) {
            self.0.lock().unwrap().insert(hash_token(token));
        }
    }

    #[async_trait]
    impl RevokedTokenLookup for InMemoryBlacklist {
        async fn is_revoked(&self, token_hash: &str) -> AppResult<bool> {
            Ok(self.0.lock().unwrap().contains(token_hash))
        }
    }

    fn codec() -> JwtCodec {
        JwtCodec::new("test-secret", 3600, 7 * 24 * 3600)
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn test_access_claims_shape() {
        let codec = codec();
        let issued_at = now();
        let (token, claims) = codec.issue_access("user-1", "player@example.com", issued_at).unwrap();

        let decoded = codec.decode(&token, TokenType::Access).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.email.as_deref(), Some("player@example.com"));
        assert_eq!(decoded.exp - decoded.iat, 3600);

        let raw: serde_json::Value = serde_json::to_value(&decoded).unwrap();
        assert_eq!(raw["type"], "access");
    }

    #[test]
    fn test_tokens_issued_in_same_second_differ() {
        let codec = codec();
        let issued_at = now();
        let (a, _) = codec.issue_access("user-1", "p@example.com", issued_at).unwrap();
        let (b, _) = codec.issue_access("user-1", "p@example.com", issued_at).unwrap();
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn test_decode_distinguishes_failures() {
        let codec = codec();

        let (expired, _) = codec.issue_access("user-1", "p@example.com", now() - 7200).unwrap();
        assert_eq!(codec.decode(&expired, TokenType::Access).unwrap_err(), TokenError::Expired);

        let other = JwtCodec::new("other-secret", 3600, 3600);
        let (foreign, _) = other.issue_access("user-1", "p@example.com", now()).unwrap();
        assert_eq!(
            codec.decode(&foreign, TokenType::Access).unwrap_err(),
            TokenError::InvalidSignature
        );

        assert!(matches!(
            codec.decode("not.a.jwt", TokenType::Access).unwrap_err(),
            TokenError::Malformed(_)
        ));

        let (refresh, _) = codec.issue_refresh("user-1", now()).unwrap();
        assert!(matches!(
            codec.decode(&refresh, TokenType::Access).unwrap_err(),
            TokenError::WrongType { expected: "access", actual: "refresh" }
        ));
    }

    #[test]
    fn test_token_errors_collapse_to_invalid_token() {
        let err: AppError = TokenError::Expired.into();
        assert_eq!(err.code(), ErrorCode::InvalidToken);
        assert_eq!(err.status_code(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_blacklisted_token_is_rejected() {
        let codec = codec();
        let blacklist = InMemoryBlacklist::new();
        let (token, _) = codec.issue_access("user-1", "p@example.com", now()).unwrap();

        let user = codec.authenticate(&token, &blacklist).await.unwrap();
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.access_token, token);

        blacklist.revoke(&token);
        let err = codec.authenticate(&token, &blacklist).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::TokenRevoked);
    }

    #[test]
    fn test_hash_token_is_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
