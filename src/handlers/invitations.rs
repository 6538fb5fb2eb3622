//! # Invitation HTTP Handlers
//!
//! 초대받은 사용자 쪽의 흐름입니다. 초대는 메일로 받은 토큰으로 식별하고,
//! 취소만 팀 관리자가 초대 ID로 호출합니다.
use actix_web::{delete, get, post, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::teams::InvitationService;

/// 나에게 온 대기 중 초대 목록
#[get("/me")]
pub async fn list_my_invitations(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance().list_mine(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{token}")]
pub async fn get_invitation(
    user: AuthenticatedUser,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance()
        .get_by_token(&token, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 초대 수락
///
/// 로그인한 계정의 이메일이 초대 대상과 같아야 하며, 수락하면 MEMBER로 합류합니다.
#[post("/{token}/accept")]
pub async fn accept_invitation(
    user: AuthenticatedUser,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance()
        .accept(&token, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{token}/decline")]
pub async fn decline_invitation(
    user: AuthenticatedUser,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance()
        .decline(&token, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 초대 취소 (OWNER, LEADER)
#[delete("/{invitation_id}")]
pub async fn cancel_invitation(
    user: AuthenticatedUser,
    invitation_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance()
        .cancel(&invitation_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
