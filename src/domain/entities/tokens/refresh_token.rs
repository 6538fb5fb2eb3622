use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 저장된 리프레시 토큰
///
/// 원문 대신 SHA-256 해시를 보관합니다. 갱신 시 기존 행은 `revoked`로 바뀌고
/// 새 행이 추가됩니다 (rotation). 블랙리스트와는 독립적입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime,
    #[serde(default)]
    pub revoked: bool,
    pub created_at: DateTime,
}

impl RefreshToken {
    pub fn new(user_id: String, token_hash: String, expires_at: DateTime) -> Self {
        Self {
            id: None,
            user_id,
            token_hash,
            expires_at,
            revoked: false,
            created_at: DateTime::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        now >= self.expires_at
    }

    /// 폐기되지 않았고 만료 전인 토큰
    pub fn is_usable(&self, now: DateTime) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::plus_days;

    #[test]
    fn test_usable_until_expiry_or_revocation() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let mut token = RefreshToken::new("u1".into(), "h".into(), plus_days(now, 7));

        assert!(token.is_usable(now));
        assert!(!token.is_usable(plus_days(now, 7)));

        token.revoked = true;
        assert!(!token.is_usable(now));
    }
}
