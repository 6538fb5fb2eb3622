use serde::Serialize;

use crate::domain::entities::strategies::Strategy;
use crate::utils::time::to_rfc3339;

#[derive(Debug, Clone, Serialize)]
pub struct StrategyResponse {
    pub id: String,
    pub team_id: String,
    pub title: String,
    pub map_name: String,
    pub board: serde_json::Value,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Strategy> for StrategyResponse {
    fn from(strategy: &Strategy) -> Self {
        Self {
            id: strategy.id_string(),
            team_id: strategy.team_id.clone(),
            title: strategy.title.clone(),
            map_name: strategy.map_name.clone(),
            board: strategy.board.clone(),
            author_id: strategy.author_id.clone(),
            created_at: to_rfc3339(strategy.created_at),
            updated_at: to_rfc3339(strategy.updated_at),
        }
    }
}
