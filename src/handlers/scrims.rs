//! # Scrim HTTP Handlers
//!
//! 스크림 일정, 상태 전이, 라운드 결과 기록과 순위표 조회를 처리합니다.
//! 조회는 참가 팀 멤버, 변경은 주최 팀 OWNER/LEADER만 가능합니다.
use actix_web::{get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::scrims::{CreateScrimRequest, RecordRoundRequest, UpdateScrimRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::scrims::ScrimService;

#[post("")]
pub async fn create_scrim(
    user: AuthenticatedUser,
    payload: web::Json<CreateScrimRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = ScrimService::instance()
        .create(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/team/{team_id}")]
pub async fn list_team_scrims(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance()
        .list_by_team(&team_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{scrim_id}")]
pub async fn get_scrim(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance().get(&scrim_id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 제목/일정 변경 (SCHEDULED 상태만)
#[patch("/{scrim_id}")]
pub async fn update_scrim(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
    payload: web::Json<UpdateScrimRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = ScrimService::instance()
        .update(&scrim_id, &user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/{scrim_id}/start")]
pub async fn start_scrim(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance().start(&scrim_id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{scrim_id}/complete")]
pub async fn complete_scrim(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance().complete(&scrim_id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{scrim_id}/cancel")]
pub async fn cancel_scrim(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance().cancel(&scrim_id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 라운드 결과 기록
///
/// 참가 팀마다 결과가 하나씩 있어야 하고 순위는 1..=n을 빠짐없이 채워야 합니다.
/// SCHEDULED 스크림은 첫 기록과 함께 IN_PROGRESS로 바뀝니다.
#[post("/{scrim_id}/rounds")]
pub async fn record_round(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
    payload: web::Json<RecordRoundRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = ScrimService::instance()
        .record_round(&scrim_id, &user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/{scrim_id}/standings")]
pub async fn get_standings(
    user: AuthenticatedUser,
    scrim_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ScrimService::instance()
        .standings(&scrim_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
