//! 팀과 팀 멤버 관리
//!
//! 권한 규칙은 [`TeamRole`]에 있습니다. 팀 상세(멤버 포함)는 `team:{id}` 키로 캐시되며
//! 팀 정보나 멤버 구성이 바뀌면 무효화됩니다.

use std::collections::HashMap;
use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    caching::redis::RedisClient,
    config::CacheConfig,
    core::errors::{AppError, AppResult, ErrorCode},
    domain::dto::teams::{
        CreateTeamRequest, MyTeamResponse, TeamDetailResponse, TeamMemberResponse, TeamResponse,
        UpdateTeamRequest,
    },
    domain::entities::teams::{Team, TeamMember, TeamRole},
    domain::entities::users::User,
    repositories::strategies::StrategyRepository,
    repositories::teams::{InvitationRepository, MemberRepository, TeamRepository},
    repositories::users::UserRepository,
    utils::string_utils::clean_optional_string,
};

pub(crate) fn team_cache_key(team_id: &str) -> String {
    format!("team:{}", team_id)
}

/// 부분 수정 적용. 이름이 바뀌었으면 `true`를 반환합니다.
fn apply_update(team: &mut Team, request: UpdateTeamRequest, now: DateTime) -> bool {
    let mut renamed = false;

    if let Some(name) = request.name.map(|n| n.trim().to_string()) {
        renamed = name != team.name;
        team.name = name;
    }
    if let Some(tag) = request.tag {
        team.tag = tag.trim().to_uppercase();
    }
    if request.description.is_some() {
        team.description = clean_optional_string(request.description);
    }

    team.updated_at = now;
    renamed
}

#[service(name = "team")]
pub struct TeamService {
    team_repo: Arc<TeamRepository>,

    member_repo: Arc<MemberRepository>,

    invitation_repo: Arc<InvitationRepository>,

    strategy_repo: Arc<StrategyRepository>,

    user_repo: Arc<UserRepository>,

    redis: Arc<RedisClient>,
}

impl TeamService {
    pub async fn find_team(&self, team_id: &str) -> AppResult<Team> {
        self.team_repo
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| ErrorCode::TeamNotFound.error())
    }

    pub async fn require_member(&self, team_id: &str, user_id: &str) -> AppResult<TeamMember> {
        self.member_repo
            .find(team_id, user_id)
            .await?
            .ok_or_else(|| ErrorCode::NotTeamMember.error())
    }

    /// OWNER 또는 LEADER
    pub async fn require_manager(&self, team_id: &str, user_id: &str) -> AppResult<TeamMember> {
        let member = self.require_member(team_id, user_id).await?;
        if !member.role.can_manage() {
            return Err(ErrorCode::InsufficientTeamRole.error());
        }
        Ok(member)
    }

    async fn require_owner(&self, team_id: &str, user_id: &str) -> AppResult<TeamMember> {
        let member = self.require_member(team_id, user_id).await?;
        if !member.role.can_change_roles() {
            return Err(ErrorCode::InsufficientTeamRole.with_message("팀 소유자만 할 수 있습니다"));
        }
        Ok(member)
    }

    async fn require_active_user(&self, user_id: &str) -> AppResult<User> {
        let user = self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ErrorCode::UserNotFound.error())?;

        if !user.is_active() {
            return Err(ErrorCode::InvalidAccountStatus.error());
        }
        Ok(user)
    }

    pub async fn invalidate(&self, team_id: &str) {
        self.redis.del_or_warn(&team_cache_key(team_id)).await;
    }

    /// 팀 생성. 생성자는 OWNER가 됩니다.
    pub async fn create(&self, user_id: &str, request: CreateTeamRequest) -> AppResult<TeamResponse> {
        self.require_active_user(user_id).await?;

        let name = request.name.trim().to_string();
        if self.team_repo.find_by_name(&name).await?.is_some() {
            return Err(ErrorCode::TeamNameAlreadyExists.error());
        }

        let team = self.team_repo
            .create(Team::new(
                name,
                request.tag,
                clean_optional_string(request.description),
                user_id.to_string(),
            ))
            .await?;
        let team_id = team.id_string();

        if let Err(e) = self.member_repo
            .add(TeamMember::new(team_id.clone(), user_id.to_string(), TeamRole::Owner))
            .await
        {
            log::error!("팀 소유자 등록 실패, 팀 생성 취소: team_id={} ({})", team_id, e);
            self.team_repo.delete(&team_id).await?;
            return Err(e);
        }

        log::info!("팀 생성: {} [{}] owner={}", team.name, team.tag, user_id);
        Ok(TeamResponse::from(&team))
    }

    /// 팀 상세 (멤버 포함, 캐시)
    pub async fn get_detail(&self, team_id: &str) -> AppResult<TeamDetailResponse> {
        let key = team_cache_key(team_id);
        if let Some(cached) = self.redis.get_or_warn::<TeamDetailResponse>(&key).await {
            log::debug!("Cache hit: {}", key);
            return Ok(cached);
        }

        let team = self.find_team(team_id).await?;
        let detail = TeamDetailResponse {
            team: TeamResponse::from(&team),
            members: self.member_responses(team_id).await?,
        };

        self.redis
            .set_or_warn(&key, &detail, CacheConfig::team_ttl_seconds())
            .await;
        Ok(detail)
    }

    pub async fn list_mine(&self, user_id: &str) -> AppResult<Vec<MyTeamResponse>> {
        let memberships = self.member_repo.find_by_user(user_id).await?;
        let team_ids: Vec<String> = memberships.iter().map(|m| m.team_id.clone()).collect();
        let roles: HashMap<String, TeamRole> = memberships
            .into_iter()
            .map(|m| (m.team_id, m.role))
            .collect();

        let teams = self.team_repo.find_by_ids(&team_ids).await?;
        Ok(teams
            .iter()
            .filter_map(|team| {
                roles.get(&team.id_string()).map(|role| MyTeamResponse {
                    team: TeamResponse::from(team),
                    my_role: *role,
                })
            })
            .collect())
    }

    pub async fn update(&self, team_id: &str, user_id: &str, request: UpdateTeamRequest) -> AppResult<TeamResponse> {
        self.require_manager(team_id, user_id).await?;
        let mut team = self.find_team(team_id).await?;

        if apply_update(&mut team, request, DateTime::now()) {
            if let Some(other) = self.team_repo.find_by_name(&team.name).await? {
                if other.id != team.id {
                    return Err(ErrorCode::TeamNameAlreadyExists.error());
                }
            }
        }

        self.team_repo.save(&team).await?;
        self.invalidate(team_id).await;

        log::info!("팀 수정: team_id={} by={}", team_id, user_id);
        Ok(TeamResponse::from(&team))
    }

    /// 팀 삭제 (OWNER). 멤버, 초대, 전략도 함께 지웁니다.
    pub async fn delete(&self, team_id: &str, user_id: &str) -> AppResult<()> {
        self.require_owner(team_id, user_id).await?;

        let members = self.member_repo.delete_by_team(team_id).await?;
        let invitations = self.invitation_repo.delete_by_team(team_id).await?;
        let strategies = self.strategy_repo.delete_by_team(team_id).await?;

        if !self.team_repo.delete(team_id).await? {
            return Err(ErrorCode::TeamNotFound.error());
        }
        self.invalidate(team_id).await;

        log::info!(
            "팀 삭제: team_id={} (멤버 {}, 초대 {}, 전략 {})",
            team_id, members, invitations, strategies
        );
        Ok(())
    }

    async fn member_responses(&self, team_id: &str) -> AppResult<Vec<TeamMemberResponse>> {
        let members = self.member_repo.find_by_team(team_id).await?;
        let user_ids: Vec<String> = members.iter().map(|m| m.user_id.clone()).collect();

        let nicknames: HashMap<String, Option<String>> = self.user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .filter_map(|u| u.id_string().map(|id| (id, u.nickname)))
            .collect();

        Ok(members
            .iter()
            .map(|m| TeamMemberResponse::new(m, nicknames.get(&m.user_id).cloned().flatten()))
            .collect())
    }

    pub async fn list_members(&self, team_id: &str, user_id: &str) -> AppResult<Vec<TeamMemberResponse>> {
        self.require_member(team_id, user_id).await?;
        self.member_responses(team_id).await
    }

    /// 역할 변경 (OWNER). OWNER 역할은 소유권 이전으로만 바뀝니다.
    pub async fn change_role(
        &self,
        team_id: &str,
        actor_id: &str,
        target_id: &str,
        role: TeamRole,
    ) -> AppResult<TeamMemberResponse> {
        self.require_owner(team_id, actor_id).await?;

        if role == TeamRole::Owner {
            return Err(AppError::invalid_field("role", "소유자 지정은 소유권 이전을 이용해주세요"));
        }

        let mut target = self.member_repo
            .find(team_id, target_id)
            .await?
            .ok_or_else(|| ErrorCode::MemberNotFound.error())?;
        if target.role == TeamRole::Owner {
            return Err(ErrorCode::InsufficientTeamRole.with_message("소유자의 역할은 변경할 수 없습니다"));
        }

        self.member_repo.update_role(team_id, target_id, role).await?;
        self.invalidate(team_id).await;
        target.role = role;

        let nickname = self.user_repo.find_by_id(target_id).await?.and_then(|u| u.nickname);
        Ok(TeamMemberResponse::new(&target, nickname))
    }

    /// 소유권 이전. 기존 소유자는 LEADER가 됩니다.
    pub async fn transfer_ownership(&self, team_id: &str, actor_id: &str, new_owner_id: &str) -> AppResult<TeamResponse> {
        self.require_owner(team_id, actor_id).await?;

        if actor_id == new_owner_id {
            return Err(AppError::invalid_field("new_owner_id", "이미 팀 소유자입니다"));
        }
        if self.member_repo.find(team_id, new_owner_id).await?.is_none() {
            return Err(ErrorCode::MemberNotFound.error());
        }

        let mut team = self.find_team(team_id).await?;
        self.member_repo.update_role(team_id, new_owner_id, TeamRole::Owner).await?;
        self.member_repo.update_role(team_id, actor_id, TeamRole::Leader).await?;

        team.owner_id = new_owner_id.to_string();
        team.updated_at = DateTime::now();
        self.team_repo.save(&team).await?;
        self.invalidate(team_id).await;

        log::info!("팀 소유권 이전: team_id={} {} -> {}", team_id, actor_id, new_owner_id);
        Ok(TeamResponse::from(&team))
    }

    pub async fn remove_member(&self, team_id: &str, actor_id: &str, target_id: &str) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::invalid_field("user_id", "본인은 팀 나가기를 이용해주세요"));
        }

        let actor = self.require_member(team_id, actor_id).await?;
        let target = self.member_repo
            .find(team_id, target_id)
            .await?
            .ok_or_else(|| ErrorCode::MemberNotFound.error())?;

        if !actor.role.can_remove(target.role) {
            return Err(ErrorCode::InsufficientTeamRole.error());
        }

        self.member_repo.remove(team_id, target_id).await?;
        self.invalidate(team_id).await;

        log::info!("팀 멤버 추방: team_id={} target={} by={}", team_id, target_id, actor_id);
        Ok(())
    }

    pub async fn leave(&self, team_id: &str, user_id: &str) -> AppResult<()> {
        let member = self.require_member(team_id, user_id).await?;
        if member.role == TeamRole::Owner {
            return Err(ErrorCode::OwnerCannotLeave.error());
        }

        self.member_repo.remove(team_id, user_id).await?;
        self.invalidate(team_id).await;

        log::info!("팀 탈퇴: team_id={} user={}", team_id, user_id);
        Ok(())
    }

    /// 초대 수락 시 MEMBER로 추가
    pub async fn add_member(&self, team_id: &str, user_id: &str) -> AppResult<TeamMember> {
        let member = self.member_repo
            .add(TeamMember::new(team_id.to_string(), user_id.to_string(), TeamRole::Member))
            .await?;
        self.invalidate(team_id).await;
        Ok(member)
    }

    /// 회원 탈퇴 전 모든 팀에서 나갑니다. 소유한 팀이 있으면 실패합니다.
    pub async fn leave_all(&self, user_id: &str) -> AppResult<usize> {
        let memberships = self.member_repo.find_by_user(user_id).await?;
        if memberships.iter().any(|m| m.role == TeamRole::Owner) {
            return Err(ErrorCode::OwnerCannotLeave.with_message(
                "소유한 팀이 있습니다. 소유권을 이전하거나 팀을 삭제한 뒤 탈퇴해주세요",
            ));
        }

        for membership in &memberships {
            self.member_repo.remove(&membership.team_id, user_id).await?;
            self.invalidate(&membership.team_id).await;
        }
        Ok(memberships.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> Team {
        Team::new("Night Owls".into(), "now".into(), Some("scrim team".into()), "owner".into())
    }

    #[test]
    fn test_partial_update_keeps_omitted_fields() {
        let mut team = team();
        let renamed = apply_update(
            &mut team,
            UpdateTeamRequest { name: None, tag: Some(" nwl ".into()), description: None },
            DateTime::now(),
        );

        assert!(!renamed);
        assert_eq!(team.name, "Night Owls");
        assert_eq!(team.tag, "NWL");
        assert_eq!(team.description.as_deref(), Some("scrim team"));
    }

    #[test]
    fn test_rename_is_reported() {
        let mut team = team();
        assert!(apply_update(
            &mut team,
            UpdateTeamRequest { name: Some("Early Birds".into()), tag: None, description: None },
            DateTime::now(),
        ));
        assert!(!apply_update(
            &mut team,
            UpdateTeamRequest { name: Some("Early Birds".into()), tag: None, description: None },
            DateTime::now(),
        ));
    }

    #[test]
    fn test_team_cache_key() {
        assert_eq!(team_cache_key("65f0c0ffee"), "team:65f0c0ffee");
    }
}
