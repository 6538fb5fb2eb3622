//! JWT 클레임과 클라이언트에 내려주는 토큰 쌍

use serde::{Deserialize, Serialize};

/// 토큰 용도. 클레임의 `type` 필드로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT 토큰의 클레임(Payload) 구조체
///
/// - `sub`: 사용자 ID
/// - `email`: 액세스 토큰에만 포함
/// - `type`: `access` / `refresh`
/// - `iat`, `exp`: Unix timestamp (초)
/// - `jti`: 토큰마다 새로 발급되는 UUID. 같은 초에 발급된 토큰도 해시가 달라집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// JWT 토큰 쌍 구조체
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 항상 `Bearer`
    pub token_type: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}
