use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlacklistReason {
    Logout,
    PasswordChanged,
    AccountWithdrawn,
}

/// 폐기된 액세스 토큰
///
/// 토큰 원문의 SHA-256 해시와 원래 만료 시각을 보관합니다.
/// 만료 시각이 지난 행은 정리 작업이 삭제합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBlacklist {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub token_hash: String,
    pub user_id: String,
    pub reason: BlacklistReason,
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

impl TokenBlacklist {
    pub fn new(token_hash: String, user_id: String, reason: BlacklistReason, expires_at: DateTime) -> Self {
        Self {
            id: None,
            token_hash,
            user_id,
            reason,
            expires_at,
            created_at: DateTime::now(),
        }
    }
}
