use serde::{Deserialize, Serialize};

use crate::domain::entities::teams::{Team, TeamInvitation, TeamMember, TeamRole};
use crate::utils::time::to_rfc3339;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id_string(),
            name: team.name.clone(),
            tag: team.tag.clone(),
            description: team.description.clone(),
            owner_id: team.owner_id.clone(),
            created_at: to_rfc3339(team.created_at),
            updated_at: to_rfc3339(team.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberResponse {
    pub user_id: String,
    pub nickname: Option<String>,
    pub role: TeamRole,
    pub joined_at: String,
}

impl TeamMemberResponse {
    pub fn new(member: &TeamMember, nickname: Option<String>) -> Self {
        Self {
            user_id: member.user_id.clone(),
            nickname,
            role: member.role,
            joined_at: to_rfc3339(member.joined_at),
        }
    }
}

/// 팀 상세. `team:{id}` 키로 캐시됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<TeamMemberResponse>,
}

/// 내 팀 목록 항목
#[derive(Debug, Clone, Serialize)]
pub struct MyTeamResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub my_role: TeamRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub team_id: String,
    pub team_name: String,
    pub invitee_email: String,
    pub inviter_id: String,
    /// 초대받은 본인에게만 노출
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub status: String,
    pub expires_at: String,
    pub responded_at: Option<String>,
    pub created_at: String,
}

impl InvitationResponse {
    fn build(invitation: &TeamInvitation, token: Option<String>) -> Self {
        let status = serde_json::to_value(invitation.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            id: invitation.id_string(),
            team_id: invitation.team_id.clone(),
            team_name: invitation.team_name.clone(),
            invitee_email: invitation.invitee_email.clone(),
            inviter_id: invitation.inviter_id.clone(),
            token,
            status,
            expires_at: to_rfc3339(invitation.expires_at),
            responded_at: invitation.responded_at.map(to_rfc3339),
            created_at: to_rfc3339(invitation.created_at),
        }
    }

    /// 팀 관리자용 (토큰 제외)
    pub fn for_team(invitation: &TeamInvitation) -> Self {
        Self::build(invitation, None)
    }

    /// 초대받은 사용자용 (토큰 포함)
    pub fn for_invitee(invitation: &TeamInvitation) -> Self {
        Self::build(invitation, Some(invitation.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::plus_days;
    use mongodb::bson::DateTime;

    #[test]
    fn test_invitation_token_visibility() {
        let invitation = TeamInvitation::new(
            "team".into(),
            "Night Owls".into(),
            "invitee@example.com".into(),
            "inviter".into(),
            plus_days(DateTime::now(), 7),
        );

        let team_view = serde_json::to_value(InvitationResponse::for_team(&invitation)).unwrap();
        assert!(team_view.get("token").is_none());
        assert_eq!(team_view["status"], "PENDING");

        let invitee_view = serde_json::to_value(InvitationResponse::for_invitee(&invitation)).unwrap();
        assert_eq!(invitee_view["token"], invitation.token.as_str());
    }
}
