use std::future::{ready, Ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, ErrorCode};

/// JWT 액세스 토큰에서 추출된 사용자 정보
///
/// `AuthMiddleware`가 검증에 성공하면 Request Extensions에 넣어 두고,
/// 핸들러는 인자로 받아 꺼내 씁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (`sub`)
    pub user_id: String,

    /// 토큰 발급 시점의 이메일
    pub email: String,

    /// 사용자 역할 목록
    pub roles: Vec<String>,

    /// 로그아웃 시 블랙리스트에 올릴 원본 액세스 토큰
    #[serde(skip)]
    pub access_token: String,

    /// 액세스 토큰 만료 시각 (Unix seconds)
    pub expires_at: i64,
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorCode::AuthenticationRequired.error())),
        }
    }
}
