use serde::{Deserialize, Serialize};

use crate::domain::entities::scrims::{MatchResult, Scrim, ScrimMatch, TeamStanding};
use crate::utils::time::to_rfc3339;

#[derive(Debug, Clone, Serialize)]
pub struct ScrimMatchResponse {
    pub round: u32,
    pub map_name: String,
    pub results: Vec<MatchResult>,
    pub played_at: String,
}

impl From<&ScrimMatch> for ScrimMatchResponse {
    fn from(m: &ScrimMatch) -> Self {
        Self {
            round: m.round,
            map_name: m.map_name.clone(),
            results: m.results.clone(),
            played_at: to_rfc3339(m.played_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrimResponse {
    pub id: String,
    pub title: String,
    pub host_team_id: String,
    pub participant_team_ids: Vec<String>,
    pub scheduled_at: String,
    pub status: String,
    pub matches: Vec<ScrimMatchResponse>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Scrim> for ScrimResponse {
    fn from(scrim: &Scrim) -> Self {
        Self {
            id: scrim.id_string(),
            title: scrim.title.clone(),
            host_team_id: scrim.host_team_id.clone(),
            participant_team_ids: scrim.participant_team_ids.clone(),
            scheduled_at: to_rfc3339(scrim.scheduled_at),
            status: scrim.status.as_str().to_string(),
            matches: scrim.matches.iter().map(ScrimMatchResponse::from).collect(),
            created_by: scrim.created_by.clone(),
            created_at: to_rfc3339(scrim.created_at),
            updated_at: to_rfc3339(scrim.updated_at),
        }
    }
}

/// 순위표. `scrim:standings:{id}` 키로 캐시됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub scrim_id: String,
    pub rounds_recorded: u32,
    pub standings: Vec<TeamStanding>,
}

impl From<&Scrim> for StandingsResponse {
    fn from(scrim: &Scrim) -> Self {
        Self {
            scrim_id: scrim.id_string(),
            rounds_recorded: scrim.matches.len() as u32,
            standings: scrim.standings(),
        }
    }
}
