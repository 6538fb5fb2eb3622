use serde::{Deserialize, Serialize};

/// 카카오 토큰 엔드포인트 응답
#[derive(Debug, Deserialize)]
pub struct KakaoTokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// `/v2/user/me` 응답
#[derive(Debug, Deserialize)]
pub struct KakaoUserInfo {
    pub id: i64,
    #[serde(default)]
    pub kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoAccount {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_email_verified: Option<bool>,
    #[serde(default)]
    pub profile: Option<KakaoProfile>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoProfile {
    #[serde(default)]
    pub nickname: Option<String>,
}

impl KakaoUserInfo {
    pub fn provider_id(&self) -> String {
        self.id.to_string()
    }

    /// 인증된 이메일만 돌려줍니다.
    pub fn verified_email(&self) -> Option<&str> {
        let account = self.kakao_account.as_ref()?;
        match (account.email.as_deref(), account.is_email_verified) {
            (Some(email), Some(true)) => Some(email),
            _ => None,
        }
    }
}

/// Redis에 보관하는 OAuth state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    pub provider: String,
    pub issued_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_email_requires_verification_flag() {
        let info: KakaoUserInfo = serde_json::from_str(
            r#"{"id": 42, "kakao_account": {"email": "p@kakao.com", "is_email_verified": true}}"#,
        )
        .unwrap();
        assert_eq!(info.provider_id(), "42");
        assert_eq!(info.verified_email(), Some("p@kakao.com"));

        let unverified: KakaoUserInfo = serde_json::from_str(
            r#"{"id": 7, "kakao_account": {"email": "p@kakao.com", "is_email_verified": false}}"#,
        )
        .unwrap();
        assert_eq!(unverified.verified_email(), None);

        let bare: KakaoUserInfo = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(bare.verified_email(), None);
    }
}
