//! # 카카오 OAuth 2.0 로그인
//!
//! ```text
//! GET /auth/kakao/login     ─▶ state 발급 (Redis, 10분, 1회용) + 인가 URL
//! GET /auth/kakao/callback  ─▶ state 확인 ─▶ code → access token ─▶ 사용자 정보
//!                              ├─ provider_id 일치하는 KAKAO 계정: 로그인
//!                              ├─ 이메일이 다른 방식으로 가입됨:    OAUTH_EMAIL_CONFLICT
//!                              └─ 신규:                         PENDING_NICKNAME 계정 생성
//! ```

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    caching::redis::RedisClient,
    config::{AuthProvider, KakaoOAuthConfig, OAuthConfig},
    core::errors::{AppError, AppResult, ErrorCode},
    domain::dto::auth::{AuthResponse, OAuthCallbackQuery, OAuthLoginUrlResponse},
    domain::dto::users::UserResponse,
    domain::entities::users::User,
    domain::models::oauth::kakao_oauth_model::{KakaoTokenResponse, KakaoUserInfo, OAuthState},
    repositories::users::UserRepository,
    services::auth::{auth_service::check_login_status, TokenService},
    utils::string_utils::normalize_email,
};

const STATE_KEY_PREFIX: &str = "oauth_state";

fn state_key(state: &str) -> String {
    format!("{}:{}", STATE_KEY_PREFIX, state)
}

fn required(value: Option<String>, name: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::ExternalServiceError(format!("카카오 OAuth 설정 누락: {}", name)))
}

/// 인가 URL 조립
fn authorization_url(auth_uri: &str, client_id: &str, redirect_uri: &str, state: &str) -> String {
    let params = [
        ("response_type", "code"),
        ("client_id", client_id),
        ("redirect_uri", redirect_uri),
        ("state", state),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", auth_uri, query_string)
}

#[service(name = "oauth")]
pub struct OAuthService {
    user_repo: Arc<UserRepository>,

    redis: Arc<RedisClient>,

    token_service: Arc<TokenService>,

    http: reqwest::Client,
}

impl OAuthService {
    pub async fn kakao_login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
        let client_id = required(KakaoOAuthConfig::client_id(), "KAKAO_CLIENT_ID")?;
        let redirect_uri = required(KakaoOAuthConfig::redirect_uri(), "KAKAO_REDIRECT_URI")?;

        let state = uuid::Uuid::new_v4().simple().to_string();
        let payload = OAuthState {
            provider: AuthProvider::Kakao.as_str().to_string(),
            issued_at: chrono::Utc::now().timestamp(),
        };
        self.redis
            .set_with_expiry(&state_key(&state), &payload, OAuthConfig::state_ttl_seconds())
            .await?;

        Ok(OAuthLoginUrlResponse {
            authorization_url: authorization_url(&KakaoOAuthConfig::auth_uri(), &client_id, &redirect_uri, &state),
            state,
        })
    }

    pub async fn kakao_callback(&self, query: OAuthCallbackQuery) -> AppResult<AuthResponse> {
        if let Some(error) = query.error {
            log::warn!("카카오 인가 거부: {} ({})", error, query.error_description.unwrap_or_default());
            return Err(ErrorCode::AuthenticationRequired.with_message("카카오 로그인이 취소되었습니다"));
        }

        let state = query.state.ok_or_else(|| ErrorCode::InvalidOauthState.error())?;
        self.consume_state(&state).await?;

        let code = query.code
            .ok_or_else(|| AppError::invalid_field("code", "인가 코드가 없습니다"))?;

        let token = self.exchange_code(&code).await?;
        let kakao_user = self.fetch_user_info(&token.access_token).await?;

        let user = self.resolve_user(&kakao_user).await?;
        check_login_status(&user)?;

        let tokens = self.token_service.issue_pair(&user).await?;
        Ok(AuthResponse {
            user: UserResponse::from(&user),
            tokens,
        })
    }

    /// state는 한 번만 사용할 수 있습니다.
    async fn consume_state(&self, state: &str) -> AppResult<()> {
        let stored: Option<OAuthState> = self.redis.take(&state_key(state)).await?;

        match stored {
            Some(s) if s.provider == AuthProvider::Kakao.as_str() => Ok(()),
            _ => {
                log::warn!("알 수 없거나 만료된 OAuth state: {}", state);
                Err(ErrorCode::InvalidOauthState.error())
            }
        }
    }

    async fn resolve_user(&self, kakao_user: &KakaoUserInfo) -> AppResult<User> {
        let provider_id = kakao_user.provider_id();

        if let Some(mut user) = self.user_repo.find_by_provider(AuthProvider::Kakao, &provider_id).await? {
            check_login_status(&user)?;
            user.login_success(DateTime::now());
            self.user_repo.save(&user).await?;

            log::info!("카카오 로그인: provider_id={}", provider_id);
            return Ok(user);
        }

        let email = kakao_user
            .verified_email()
            .map(normalize_email)
            .ok_or_else(|| AppError::invalid_field("email", "카카오 계정에 인증된 이메일이 없습니다"))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ErrorCode::OauthEmailConflict.error());
        }

        let mut user = User::new_oauth(email, AuthProvider::Kakao, provider_id);
        user.login_success(DateTime::now());
        let created = self.user_repo.create(user).await?;

        log::info!("카카오 신규 가입: {}", created.email);
        Ok(created)
    }

    async fn exchange_code(&self, code: &str) -> AppResult<KakaoTokenResponse> {
        let client_id = required(KakaoOAuthConfig::client_id(), "KAKAO_CLIENT_ID")?;
        let redirect_uri = required(KakaoOAuthConfig::redirect_uri(), "KAKAO_REDIRECT_URI")?;
        let client_secret = KakaoOAuthConfig::client_secret();

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("code", code),
        ];
        if let Some(secret) = client_secret.as_deref() {
            params.push(("client_secret", secret));
        }

        let response = self.http
            .post(KakaoOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("카카오 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!("카카오 토큰 교환 실패: {}", error_text)));
        }

        response
            .json::<KakaoTokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("카카오 토큰 응답 파싱 실패: {}", e)))
    }

    async fn fetch_user_info(&self, access_token: &str) -> AppResult<KakaoUserInfo> {
        let response = self.http
            .get(KakaoOAuthConfig::user_info_uri())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("카카오 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!("카카오 사용자 정보 조회 실패: {}", error_text)));
        }

        response
            .json::<KakaoUserInfo>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("카카오 사용자 정보 파싱 실패: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_is_encoded() {
        let url = authorization_url(
            "https://kauth.kakao.com/oauth/authorize",
            "client-1",
            "http://localhost:8080/api/v1/auth/kakao/callback",
            "abc123",
        );

        assert!(url.starts_with("https://kauth.kakao.com/oauth/authorize?response_type=code"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fapi%2Fv1%2Fauth%2Fkakao%2Fcallback"));
        assert!(url.ends_with("state=abc123"));
    }

    #[test]
    fn test_state_key_prefix() {
        assert_eq!(state_key("abc"), "oauth_state:abc");
    }
}
