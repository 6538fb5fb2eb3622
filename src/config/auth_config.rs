//! 인증 관련 설정
//!
//! JWT 서명 키와 만료, OAuth(Kakao) 클라이언트 정보, 이메일 인증 코드와
//! 팀 초대 토큰의 유효 기간을 다룹니다.

use std::env;
use serde::{Deserialize, Serialize};

use super::data_config::env_parse;

/// JWT 설정 (HS256)
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "team-manager-development-secret".to_string()
        })
    }

    pub fn access_expiration_minutes() -> i64 {
        env_parse("JWT_ACCESS_EXPIRATION_MINUTES", 60)
    }

    pub fn refresh_expiration_days() -> i64 {
        env_parse("JWT_REFRESH_EXPIRATION_DAYS", 7)
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    /// 발급한 state가 유효한 시간
    pub fn state_ttl_seconds() -> u64 {
        env_parse("OAUTH_STATE_TTL_SECONDS", 600)
    }
}

/// Kakao OAuth 클라이언트 설정
///
/// 필수 값이 없으면 `None`을 돌려주며, 서비스는 외부 서비스 에러로 응답합니다.
pub struct KakaoOAuthConfig;

impl KakaoOAuthConfig {
    pub fn client_id() -> Option<String> {
        env::var("KAKAO_CLIENT_ID").ok().filter(|v| !v.is_empty())
    }

    pub fn client_secret() -> Option<String> {
        env::var("KAKAO_CLIENT_SECRET").ok().filter(|v| !v.is_empty())
    }

    pub fn redirect_uri() -> Option<String> {
        env::var("KAKAO_REDIRECT_URI").ok().filter(|v| !v.is_empty())
    }

    pub fn auth_uri() -> String {
        env::var("KAKAO_AUTH_URI")
            .unwrap_or_else(|_| "https://kauth.kakao.com/oauth/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env::var("KAKAO_TOKEN_URI")
            .unwrap_or_else(|_| "https://kauth.kakao.com/oauth/token".to_string())
    }

    pub fn user_info_uri() -> String {
        env::var("KAKAO_USER_INFO_URI")
            .unwrap_or_else(|_| "https://kapi.kakao.com/v2/user/me".to_string())
    }
}

/// 이메일 인증 코드 설정
pub struct VerificationConfig;

impl VerificationConfig {
    pub fn expiration_minutes() -> i64 {
        env_parse("EMAIL_VERIFICATION_EXPIRATION_MINUTES", 15)
    }

    pub fn max_attempts() -> u32 {
        env_parse("EMAIL_VERIFICATION_MAX_ATTEMPTS", 5)
    }
}

pub struct InvitationConfig;

impl InvitationConfig {
    pub fn expiration_days() -> i64 {
        env_parse("TEAM_INVITATION_EXPIRATION_DAYS", 7)
    }
}

/// 가입 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Email,

    /// 값으로만 인식하며 로그인 흐름은 제공하지 않습니다.
    Steam,

    Kakao,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "email" => Ok(AuthProvider::Email),
            "steam" => Ok(AuthProvider::Steam),
            "kakao" => Ok(AuthProvider::Kakao),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "EMAIL",
            AuthProvider::Steam => "STEAM",
            AuthProvider::Kakao => "KAKAO",
        }
    }

    pub fn is_oauth(&self) -> bool {
        !matches!(self, AuthProvider::Email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("email").unwrap(), AuthProvider::Email);
        assert_eq!(AuthProvider::from_str("KAKAO").unwrap(), AuthProvider::Kakao);
        assert_eq!(AuthProvider::from_str("Steam").unwrap(), AuthProvider::Steam);
        assert!(AuthProvider::from_str("google").is_err());
    }

    #[test]
    fn test_auth_provider_wire_format() {
        assert_eq!(serde_json::to_string(&AuthProvider::Kakao).unwrap(), "\"KAKAO\"");
        let parsed: AuthProvider = serde_json::from_str("\"EMAIL\"").unwrap();
        assert_eq!(parsed, AuthProvider::Email);
        assert_eq!(AuthProvider::Steam.as_str(), "STEAM");
    }

    #[test]
    fn test_only_email_is_local() {
        assert!(!AuthProvider::Email.is_oauth());
        assert!(AuthProvider::Kakao.is_oauth());
        assert!(AuthProvider::Steam.is_oauth());
    }

    #[test]
    fn test_expiration_defaults() {
        if env::var("JWT_ACCESS_EXPIRATION_MINUTES").is_err() {
            assert_eq!(JwtConfig::access_expiration_minutes(), 60);
        }
        if env::var("JWT_REFRESH_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::refresh_expiration_days(), 7);
        }
        if env::var("EMAIL_VERIFICATION_EXPIRATION_MINUTES").is_err() {
            assert_eq!(VerificationConfig::expiration_minutes(), 15);
        }
        if env::var("TEAM_INVITATION_EXPIRATION_DAYS").is_err() {
            assert_eq!(InvitationConfig::expiration_days(), 7);
        }
    }
}
