use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    core::errors::{AppResult, ErrorCode},
    domain::dto::strategies::{CreateStrategyRequest, StrategyResponse, UpdateStrategyRequest},
    domain::entities::strategies::Strategy,
    domain::entities::teams::TeamRole,
    repositories::strategies::StrategyRepository,
    services::teams::TeamService,
};

/// 작성자 본인이거나 팀 OWNER/LEADER
fn can_edit(strategy: &Strategy, user_id: &str, role: TeamRole) -> bool {
    strategy.is_author(user_id) || role.can_manage()
}

/// 팀 전략 보드. 팀 멤버만 접근할 수 있습니다.
#[service(name = "strategy")]
pub struct StrategyService {
    strategy_repo: Arc<StrategyRepository>,

    team_service: Arc<TeamService>,
}

impl StrategyService {
    async fn find_visible(&self, strategy_id: &str, user_id: &str) -> AppResult<(Strategy, TeamRole)> {
        let strategy = self.strategy_repo
            .find_by_id(strategy_id)
            .await?
            .ok_or_else(|| ErrorCode::StrategyNotFound.error())?;

        let member = self.team_service.require_member(&strategy.team_id, user_id).await?;
        Ok((strategy, member.role))
    }

    async fn find_editable(&self, strategy_id: &str, user_id: &str) -> AppResult<Strategy> {
        let (strategy, role) = self.find_visible(strategy_id, user_id).await?;
        if !can_edit(&strategy, user_id, role) {
            return Err(ErrorCode::InsufficientTeamRole.with_message("작성자 또는 팀 관리자만 수정할 수 있습니다"));
        }
        Ok(strategy)
    }

    pub async fn create(&self, user_id: &str, request: CreateStrategyRequest) -> AppResult<StrategyResponse> {
        self.team_service.require_member(&request.team_id, user_id).await?;

        let strategy = self.strategy_repo
            .create(Strategy::new(
                request.team_id,
                request.title.trim().to_string(),
                request.map_name.trim().to_string(),
                request.board,
                user_id.to_string(),
            ))
            .await?;

        log::info!("전략 생성: {} team={}", strategy.id_string(), strategy.team_id);
        Ok(StrategyResponse::from(&strategy))
    }

    pub async fn list_by_team(&self, team_id: &str, user_id: &str) -> AppResult<Vec<StrategyResponse>> {
        self.team_service.require_member(team_id, user_id).await?;

        let strategies = self.strategy_repo.find_by_team(team_id).await?;
        Ok(strategies.iter().map(StrategyResponse::from).collect())
    }

    pub async fn get(&self, strategy_id: &str, user_id: &str) -> AppResult<StrategyResponse> {
        let (strategy, _) = self.find_visible(strategy_id, user_id).await?;
        Ok(StrategyResponse::from(&strategy))
    }

    pub async fn update(&self, strategy_id: &str, user_id: &str, request: UpdateStrategyRequest) -> AppResult<StrategyResponse> {
        let mut strategy = self.find_editable(strategy_id, user_id).await?;

        strategy.apply_update(
            request.title.map(|t| t.trim().to_string()),
            request.map_name.map(|m| m.trim().to_string()),
            request.board,
            DateTime::now(),
        );
        self.strategy_repo.save(&strategy).await?;
        Ok(StrategyResponse::from(&strategy))
    }

    pub async fn delete(&self, strategy_id: &str, user_id: &str) -> AppResult<()> {
        self.find_editable(strategy_id, user_id).await?;

        if !self.strategy_repo.delete(strategy_id).await? {
            return Err(ErrorCode::StrategyNotFound.error());
        }
        log::info!("전략 삭제: {} by={}", strategy_id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_permission() {
        let strategy = Strategy::new(
            "team".into(),
            "B site rush".into(),
            "Mirage".into(),
            serde_json::json!({ "markers": [] }),
            "author".into(),
        );

        assert!(can_edit(&strategy, "author", TeamRole::Member));
        assert!(can_edit(&strategy, "someone", TeamRole::Leader));
        assert!(can_edit(&strategy, "someone", TeamRole::Owner));
        assert!(!can_edit(&strategy, "someone", TeamRole::Member));
    }
}
