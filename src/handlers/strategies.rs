//! # Strategy HTTP Handlers
//!
//! 팀 전략 보드 CRUD. 팀 멤버만 접근할 수 있고 수정/삭제는 작성자 또는 OWNER/LEADER만 가능합니다.
use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::strategies::{CreateStrategyRequest, UpdateStrategyRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::strategies::StrategyService;

#[post("")]
pub async fn create_strategy(
    user: AuthenticatedUser,
    payload: web::Json<CreateStrategyRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = StrategyService::instance()
        .create(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/team/{team_id}")]
pub async fn list_team_strategies(
    user: AuthenticatedUser,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = StrategyService::instance()
        .list_by_team(&team_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{strategy_id}")]
pub async fn get_strategy(
    user: AuthenticatedUser,
    strategy_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = StrategyService::instance()
        .get(&strategy_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{strategy_id}")]
pub async fn update_strategy(
    user: AuthenticatedUser,
    strategy_id: web::Path<String>,
    payload: web::Json<UpdateStrategyRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = StrategyService::instance()
        .update(&strategy_id, &user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{strategy_id}")]
pub async fn delete_strategy(
    user: AuthenticatedUser,
    strategy_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    StrategyService::instance()
        .delete(&strategy_id, &user.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
