//! Authentication HTTP Handlers
//!
//! 가입, 로그인, 토큰 갱신과 계정 복구 흐름을 처리하는 핸들러입니다.
//!
//! # Endpoints (`/api/v1/auth`)
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `POST` | `/register` | 이메일 가입, 인증 코드 발송 |
//! | `POST` | `/verify-email` | 가입 인증 코드 확인 |
//! | `POST` | `/resend-verification` | 가입 인증 코드 재발송 |
//! | `POST` | `/login` | 로컬 로그인 |
//! | `POST` | `/refresh` | 리프레시 토큰 회전 |
//! | `POST` | `/logout` | 로그아웃 (인증 필요) |
//! | `POST` | `/unlock/request`, `/unlock/confirm` | 잠긴 계정 해제 |
//! | `POST` | `/reactivate/request`, `/reactivate/confirm` | 휴면 계정 재활성화 |
//! | `POST` | `/password-reset/request`, `/password-reset/confirm` | 비밀번호 재설정 |
//! | `GET` | `/kakao/login`, `/kakao/callback` | 카카오 OAuth |
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::auth::{
    EmailCodeRequest, EmailRequest, LoginRequest, OAuthCallbackQuery, PasswordResetConfirmRequest,
    RefreshTokenRequest, RegisterRequest,
};
use crate::domain::dto::MessageResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::auth::{AuthService, OAuthService};

/// 이메일 회원가입
///
/// 계정은 `PENDING_EMAIL` 상태로 만들어지고 인증 코드가 메일로 발송됩니다.
///
/// # Endpoint
/// `POST /auth/register`
#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance()
        .register(payload.email.trim(), &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// 가입 인증 코드 확인
///
/// # Endpoint
/// `POST /auth/verify-email`
#[post("/verify-email")]
pub async fn verify_email(
    payload: web::Json<EmailCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = AuthService::instance()
        .verify_email(payload.email.trim(), &payload.code)
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

#[post("/resend-verification")]
pub async fn resend_verification(
    payload: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance()
        .resend_verification(payload.email.trim())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("인증 코드를 다시 발송했습니다")))
}

/// 로컬 로그인 핸들러
///
/// 성공하면 액세스/리프레시 토큰 쌍과 사용자 정보를 돌려줍니다.
/// 연속 5회 실패하면 계정이 잠깁니다.
///
/// # Endpoint
/// `POST /auth/login`
#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance()
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 리프레시 토큰으로 새 토큰 쌍 발급
///
/// 사용한 리프레시 토큰은 폐기됩니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh(
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let tokens = AuthService::instance()
        .refresh(&payload.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// 로그아웃
///
/// 현재 액세스 토큰을 블랙리스트에 올리고 리프레시 토큰을 모두 폐기합니다.
/// 라우트에서 `AuthMiddleware::required()`로 감싸 등록합니다.
///
/// # Endpoint
/// `POST /auth/logout`
pub async fn logout(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    AuthService::instance().logout(&user).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("로그아웃되었습니다")))
}

#[post("/unlock/request")]
pub async fn request_unlock(
    payload: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    AuthService::instance().request_unlock(payload.email.trim()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("잠금 해제 코드를 발송했습니다")))
}

#[post("/unlock/confirm")]
pub async fn confirm_unlock(
    payload: web::Json<EmailCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let user = AuthService::instance()
        .confirm_unlock(payload.email.trim(), &payload.code)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/reactivate/request")]
pub async fn request_reactivation(
    payload: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    AuthService::instance().request_reactivation(payload.email.trim()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("휴면 해제 코드를 발송했습니다")))
}

#[post("/reactivate/confirm")]
pub async fn confirm_reactivation(
    payload: web::Json<EmailCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let user = AuthService::instance()
        .confirm_reactivation(payload.email.trim(), &payload.code)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// 비밀번호 재설정 코드 요청
///
/// 가입 여부를 노출하지 않도록 항상 같은 응답을 돌려줍니다.
#[post("/password-reset/request")]
pub async fn request_password_reset(
    payload: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    AuthService::instance().request_password_reset(payload.email.trim()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "가입된 이메일이라면 재설정 코드가 발송됩니다",
    )))
}

#[post("/password-reset/confirm")]
pub async fn confirm_password_reset(
    payload: web::Json<PasswordResetConfirmRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    AuthService::instance()
        .confirm_password_reset(payload.email.trim(), &payload.code, &payload.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("비밀번호가 변경되었습니다")))
}

/// 카카오 로그인 URL 생성
///
/// # Endpoint
/// `GET /auth/kakao/login`
#[get("/kakao/login")]
pub async fn kakao_login_url() -> Result<HttpResponse, AppError> {
    let response = OAuthService::instance().kakao_login_url().await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 카카오 OAuth 콜백 처리
///
/// # Endpoint
/// `GET /auth/kakao/callback?code={code}&state={state}`
#[get("/kakao/callback")]
pub async fn kakao_callback(
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let response = OAuthService::instance()
        .kakao_callback(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
