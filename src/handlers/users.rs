//! # User HTTP Handlers
//!
//! 로그인한 사용자의 프로필, 닉네임, 비밀번호, 탈퇴를 처리합니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/users/me` | 내 정보 | 200 OK |
//! | `POST` | `/users/me/nickname` | 최초 닉네임 설정 | 200 OK |
//! | `PATCH` | `/users/me/nickname` | 닉네임 변경 (30일 제한) | 200 OK |
//! | `PATCH` | `/users/me/password` | 비밀번호 변경 | 200 OK |
//! | `DELETE` | `/users/me` | 회원 탈퇴 | 204 No Content |
//! | `GET` | `/users/{id}` | 공개 프로필 | 200 OK |
use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::users::{ChangePasswordRequest, NicknameRequest};
use crate::domain::dto::MessageResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::users::UserService;

#[get("/me")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = UserService::instance().get_me(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 최초 닉네임 설정
///
/// `PENDING_NICKNAME` 계정만 호출할 수 있고, 성공하면 계정이 `ACTIVE`가 됩니다.
#[post("/me/nickname")]
pub async fn set_initial_nickname(
    user: AuthenticatedUser,
    payload: web::Json<NicknameRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = UserService::instance()
        .set_initial_nickname(&user.user_id, payload.nickname.trim())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[patch("/me/nickname")]
pub async fn update_nickname(
    user: AuthenticatedUser,
    payload: web::Json<NicknameRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = UserService::instance()
        .update_nickname(&user.user_id, payload.nickname.trim())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 비밀번호 변경
///
/// 현재 액세스 토큰도 무효화되므로 클라이언트는 다시 로그인해야 합니다.
#[patch("/me/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    UserService::instance()
        .change_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("비밀번호가 변경되었습니다. 다시 로그인해주세요")))
}

#[delete("/me")]
pub async fn withdraw(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    UserService::instance().withdraw(&user).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{user_id}")]
pub async fn get_user(
    _user: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance().get_public(&user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}
