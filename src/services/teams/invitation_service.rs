//! # 팀 초대
//!
//! ```text
//! invite (OWNER/LEADER) ─▶ PENDING ─┬─ accept  (초대받은 이메일 본인) ─▶ ACCEPTED + MEMBER 추가
//!                                   ├─ decline (초대받은 이메일 본인) ─▶ DECLINED
//!                                   ├─ cancel  (OWNER/LEADER)        ─▶ CANCELLED
//!                                   └─ 만료 시각 경과                  ─▶ EXPIRED
//! ```
//!
//! 종료 상태는 다시 바뀌지 않습니다. 전이 규칙은 [`TeamInvitation`]이 검사합니다.

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    config::InvitationConfig,
    core::errors::{AppResult, ErrorCode},
    domain::dto::teams::InvitationResponse,
    domain::entities::teams::{InvitationStatus, TeamInvitation},
    domain::entities::users::User,
    repositories::teams::{InvitationRepository, MemberRepository},
    repositories::users::UserRepository,
    services::mail::MailService,
    services::teams::TeamService,
    utils::{string_utils::normalize_email, time::plus_days},
};

fn ensure_invitee(invitation: &TeamInvitation, email: &str) -> AppResult<()> {
    if normalize_email(&invitation.invitee_email) != normalize_email(email) {
        return Err(ErrorCode::InvitationEmailMismatch.error());
    }
    Ok(())
}

#[service(name = "invitation")]
pub struct InvitationService {
    invitation_repo: Arc<InvitationRepository>,

    member_repo: Arc<MemberRepository>,

    user_repo: Arc<UserRepository>,

    team_service: Arc<TeamService>,

    mail_service: Arc<MailService>,
}

impl InvitationService {
    async fn find_user(&self, user_id: &str) -> AppResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ErrorCode::UserNotFound.error())
    }

    /// PENDING에서 나가는 전이를 저장합니다. 다른 요청이 먼저 처리했다면 INVITATION_NOT_PENDING.
    async fn record_transition(&self, invitation: &TeamInvitation) -> AppResult<()> {
        if !self.invitation_repo.save_transition(invitation, InvitationStatus::Pending).await? {
            log::info!("이미 처리된 초대: {}", invitation.id_string());
            return Err(ErrorCode::InvitationNotPending.error());
        }
        Ok(())
    }

    /// 멤버 추가에 실패한 수락을 PENDING으로 되돌립니다.
    async fn reopen(&self, accepted: &TeamInvitation) {
        let mut invitation = accepted.clone();
        invitation.status = InvitationStatus::Pending;
        invitation.responded_at = None;

        if let Err(e) = self.invitation_repo.save_transition(&invitation, InvitationStatus::Accepted).await {
            log::error!("초대 상태 복구 실패 ({}): {}", invitation.id_string(), e);
        }
    }

    async fn find_by_token(&self, token: &str) -> AppResult<TeamInvitation> {
        self.invitation_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| ErrorCode::InvitationNotFound.error())
    }

    pub async fn invite(&self, team_id: &str, inviter_id: &str, email: &str) -> AppResult<InvitationResponse> {
        self.team_service.require_manager(team_id, inviter_id).await?;
        let team = self.team_service.find_team(team_id).await?;
        let email = normalize_email(email);
        let now = DateTime::now();

        if let Some(invitee) = self.user_repo.find_by_email(&email).await? {
            if let Some(invitee_id) = invitee.id_string() {
                if self.member_repo.find(team_id, &invitee_id).await?.is_some() {
                    return Err(ErrorCode::AlreadyTeamMember.error());
                }
            }
        }

        if self.invitation_repo.find_live_pending(team_id, &email, now).await?.is_some() {
            return Err(ErrorCode::InvitationAlreadyPending.error());
        }

        let invitation = self.invitation_repo
            .create(TeamInvitation::new(
                team_id.to_string(),
                team.name.clone(),
                email.clone(),
                inviter_id.to_string(),
                plus_days(now, InvitationConfig::expiration_days()),
            ))
            .await?;

        if let Err(e) = self.mail_service
            .send_team_invitation(&email, &team.name, &invitation.token)
            .await
        {
            log::warn!("초대 메일 발송 실패 (초대는 유지): {} ({})", email, e);
        }

        log::info!("팀 초대: team_id={} email={} by={}", team_id, email, inviter_id);
        Ok(InvitationResponse::for_team(&invitation))
    }

    pub async fn list_for_team(&self, team_id: &str, user_id: &str) -> AppResult<Vec<InvitationResponse>> {
        self.team_service.require_manager(team_id, user_id).await?;

        let invitations = self.invitation_repo.find_by_team(team_id).await?;
        Ok(invitations.iter().map(InvitationResponse::for_team).collect())
    }

    /// 내 이메일로 온 유효한 초대
    pub async fn list_mine(&self, user_id: &str) -> AppResult<Vec<InvitationResponse>> {
        let user = self.find_user(user_id).await?;

        let invitations = self.invitation_repo
            .find_live_pending_by_email(&user.email, DateTime::now())
            .await?;
        Ok(invitations.iter().map(InvitationResponse::for_invitee).collect())
    }

    pub async fn get_by_token(&self, token: &str, user_id: &str) -> AppResult<InvitationResponse> {
        let user = self.find_user(user_id).await?;
        let invitation = self.find_by_token(token).await?;
        ensure_invitee(&invitation, &user.email)?;

        Ok(InvitationResponse::for_invitee(&invitation))
    }

    /// 초대 수락
    ///
    /// 만료된 PENDING 초대는 EXPIRED로 저장한 뒤 실패합니다.
    pub async fn accept(&self, token: &str, user_id: &str) -> AppResult<InvitationResponse> {
        let user = self.find_user(user_id).await?;
        let mut invitation = self.find_by_token(token).await?;
        ensure_invitee(&invitation, &user.email)?;

        if !user.is_active() {
            return Err(ErrorCode::InvalidAccountStatus.error());
        }

        let now = DateTime::now();
        if invitation.mark_as_expired(now) {
            self.invitation_repo.save_transition(&invitation, InvitationStatus::Pending).await?;
            log::info!("만료된 초대 수락 시도: {}", invitation.id_string());
            return Err(ErrorCode::InvitationExpired.error());
        }

        invitation.accept(now)?;
        self.record_transition(&invitation).await?;

        if let Err(e) = self.team_service.add_member(&invitation.team_id, user_id).await {
            self.reopen(&invitation).await;
            return Err(e);
        }

        log::info!("팀 초대 수락: team_id={} user={}", invitation.team_id, user_id);
        Ok(InvitationResponse::for_invitee(&invitation))
    }

    pub async fn decline(&self, token: &str, user_id: &str) -> AppResult<InvitationResponse> {
        let user = self.find_user(user_id).await?;
        let mut invitation = self.find_by_token(token).await?;
        ensure_invitee(&invitation, &user.email)?;

        invitation.decline(DateTime::now())?;
        self.record_transition(&invitation).await?;

        log::info!("팀 초대 거절: team_id={} user={}", invitation.team_id, user_id);
        Ok(InvitationResponse::for_invitee(&invitation))
    }

    /// 초대 취소 (OWNER/LEADER)
    pub async fn cancel(&self, invitation_id: &str, user_id: &str) -> AppResult<InvitationResponse> {
        let mut invitation = self.invitation_repo
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(|| ErrorCode::InvitationNotFound.error())?;

        self.team_service.require_manager(&invitation.team_id, user_id).await?;

        invitation.cancel(DateTime::now())?;
        self.record_transition(&invitation).await?;

        log::info!("팀 초대 취소: {} by={}", invitation_id, user_id);
        Ok(InvitationResponse::for_team(&invitation))
    }

    pub async fn expire_overdue(&self, now: DateTime) -> AppResult<u64> {
        self.invitation_repo.expire_overdue(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitee_email_match_ignores_case() {
        let invitation = TeamInvitation::new(
            "team".into(),
            "Night Owls".into(),
            "invitee@example.com".into(),
            "inviter".into(),
            plus_days(DateTime::now(), 7),
        );

        assert!(ensure_invitee(&invitation, "Invitee@Example.com").is_ok());
        assert_eq!(
            ensure_invitee(&invitation, "someone@example.com").unwrap_err().code(),
            ErrorCode::InvitationEmailMismatch
        );
    }
}
