//! # Team HTTP Handlers
//!
//! 팀 생성/조회/수정/삭제, 멤버 관리, 팀 단위 초대 발송을 처리합니다.
//! 모든 엔드포인트는 인증이 필요하며 권한은 서비스 계층에서 팀 역할로 확인합니다.
//!
//! | 메서드 | 경로 | 권한 |
//! |--------|------|------|
//! | `POST` | `/teams` | ACTIVE 사용자 |
//! | `GET` | `/teams` | 본인 |
//! | `GET` | `/teams/{id}` | 인증 사용자 |
//! | `PATCH` | `/teams/{id}` | OWNER, LEADER |
//! | `DELETE` | `/teams/{id}` | OWNER |
//! | `GET` | `/teams/{id}/members` | 멤버 |
//! | `PATCH` | `/teams/{id}/members/{user_id}/role` | OWNER |
//! | `DELETE` | `/teams/{id}/members/{user_id}` | OWNER, LEADER |
//! | `POST` | `/teams/{id}/leave` | OWNER 제외 멤버 |
//! | `POST` | `/teams/{id}/transfer` | OWNER |
//! | `POST` | `/teams/{id}/invitations` | OWNER, LEADER |
//! | `GET` | `/teams/{id}/invitations` | OWNER, LEADER |
use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::teams::{
    ChangeRoleRequest, CreateInvitationRequest, CreateTeamRequest, TransferOwnershipRequest,
    UpdateTeamRequest,
};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::teams::{InvitationService, TeamService};

#[post("")]
pub async fn create_team(
    user: AuthenticatedUser,
    payload: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = TeamService::instance()
        .create(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// 내가 속한 팀 목록
#[get("")]
pub async fn list_my_teams(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = TeamService::instance().list_mine(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 팀 상세 (Redis 캐시)
#[get("/{team_id}")]
pub async fn get_team(
    _user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = TeamService::instance().get_detail(&team_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{team_id}")]
pub async fn update_team(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
    payload: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = TeamService::instance()
        .update(&team_id, &user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 팀 삭제
///
/// 멤버, 초대, 전략 보드가 함께 삭제됩니다.
#[delete("/{team_id}")]
pub async fn delete_team(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    TeamService::instance().delete(&team_id, &user.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{team_id}/members")]
pub async fn list_members(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = TeamService::instance()
        .list_members(&team_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{team_id}/members/{user_id}/role")]
pub async fn change_member_role(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let (team_id, target_id) = path.into_inner();

    let response = TeamService::instance()
        .change_role(&team_id, &user.user_id, &target_id, payload.role)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 멤버 추방
///
/// OWNER는 소유자가 아닌 누구든, LEADER는 MEMBER만 추방할 수 있습니다.
#[delete("/{team_id}/members/{user_id}")]
pub async fn remove_member(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (team_id, target_id) = path.into_inner();

    TeamService::instance()
        .remove_member(&team_id, &user.user_id, &target_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[post("/{team_id}/leave")]
pub async fn leave_team(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    TeamService::instance().leave(&team_id, &user.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/{team_id}/transfer")]
pub async fn transfer_ownership(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
    payload: web::Json<TransferOwnershipRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = TeamService::instance()
        .transfer_ownership(&team_id, &user.user_id, payload.new_owner_id.trim())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 팀 초대 발송
///
/// 초대 링크가 포함된 메일이 초대 대상에게 발송됩니다.
#[post("/{team_id}/invitations")]
pub async fn invite_member(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
    payload: web::Json<CreateInvitationRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = InvitationService::instance()
        .invite(&team_id, &user.user_id, payload.email.trim())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/{team_id}/invitations")]
pub async fn list_team_invitations(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = InvitationService::instance()
        .list_for_team(&team_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
