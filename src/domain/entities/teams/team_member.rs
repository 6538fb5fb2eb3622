use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::team::TeamRole;

/// 팀 소속 정보 (team_id + user_id 유니크)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: String,
    pub user_id: String,
    pub role: TeamRole,
    pub joined_at: DateTime,
}

impl TeamMember {
    pub fn new(team_id: String, user_id: String, role: TeamRole) -> Self {
        Self {
            id: None,
            team_id,
            user_id,
            role,
            joined_at: DateTime::now(),
        }
    }
}
