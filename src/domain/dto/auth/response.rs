use serde::Serialize;

use crate::domain::dto::users::UserResponse;
use crate::domain::models::token::TokenPair;

/// 회원가입 응답. 토큰은 이메일 인증과 닉네임 설정 후 로그인으로 받습니다.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub status: String,
}

/// 로그인/토큰 갱신/OAuth 콜백 공통 응답
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct OAuthLoginUrlResponse {
    pub authorization_url: String,
    pub state: String,
}
