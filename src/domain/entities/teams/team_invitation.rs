//! # 팀 초대
//!
//! ```text
//!            accept()   ┌──────────┐
//!         ┌────────────▶│ ACCEPTED │
//!         │  decline()  ├──────────┤
//! PENDING ├────────────▶│ DECLINED │
//!         │  cancel()   ├──────────┤
//!         ├────────────▶│CANCELLED │
//!         │ mark_as_    ├──────────┤
//!         └ expired() ─▶│ EXPIRED  │
//!                       └──────────┘
//! ```
//!
//! 종료 상태는 바뀌지 않습니다. 만료 여부는 `expires_at`으로 판단하므로
//! 저장된 상태가 PENDING이어도 시각이 지났다면 수락할 수 없습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppResult, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvitation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: String,
    pub team_name: String,
    /// 소문자로 정규화된 이메일
    pub invitee_email: String,
    pub inviter_id: String,
    /// UUID v4, 1회용
    pub token: String,
    pub status: InvitationStatus,
    pub expires_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl TeamInvitation {
    pub fn new(
        team_id: String,
        team_name: String,
        invitee_email: String,
        inviter_id: String,
        expires_at: DateTime,
    ) -> Self {
        Self {
            id: None,
            team_id,
            team_name,
            invitee_email,
            inviter_id,
            token: uuid::Uuid::new_v4().to_string(),
            status: InvitationStatus::Pending,
            expires_at,
            responded_at: None,
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        now > self.expires_at
    }

    pub fn can_accept(&self, now: DateTime) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired(now)
    }

    fn require_pending(&self) -> AppResult<()> {
        if self.status != InvitationStatus::Pending {
            return Err(ErrorCode::InvitationNotPending.error());
        }
        Ok(())
    }

    pub fn accept(&mut self, now: DateTime) -> AppResult<()> {
        self.require_pending()?;
        if self.is_expired(now) {
            return Err(ErrorCode::InvitationExpired.error());
        }
        self.status = InvitationStatus::Accepted;
        self.responded_at = Some(now);
        Ok(())
    }

    pub fn decline(&mut self, now: DateTime) -> AppResult<()> {
        self.require_pending()?;
        self.status = InvitationStatus::Declined;
        self.responded_at = Some(now);
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime) -> AppResult<()> {
        self.require_pending()?;
        self.status = InvitationStatus::Cancelled;
        self.responded_at = Some(now);
        Ok(())
    }

    /// PENDING이고 만료 시각이 지났을 때만 EXPIRED로 바꾸고 `true`를 반환합니다.
    /// 그 밖의 경우에는 아무것도 하지 않습니다.
    pub fn mark_as_expired(&mut self, now: DateTime) -> bool {
        if self.status == InvitationStatus::Pending && self.is_expired(now) {
            self.status = InvitationStatus::Expired;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::plus_days;

    fn invitation(now: DateTime) -> TeamInvitation {
        TeamInvitation::new(
            "team1".into(),
            "Scrim Squad".into(),
            "rookie@example.com".into(),
            "owner1".into(),
            plus_days(now, 7),
        )
    }

    #[test]
    fn test_new_invitation_is_pending_with_opaque_token() {
        let now = DateTime::now();
        let inv = invitation(now);
        assert_eq!(inv.status, InvitationStatus::Pending);
        assert!(uuid::Uuid::parse_str(&inv.token).is_ok());
        assert_ne!(inv.token, invitation(now).token);
        assert!(inv.can_accept(now));
    }

    #[test]
    fn test_past_expiry_blocks_accept_regardless_of_stored_status() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let mut inv = invitation(now);
        let later = plus_days(now, 8);

        assert_eq!(inv.status, InvitationStatus::Pending);
        assert!(inv.is_expired(later));
        assert!(!inv.can_accept(later));

        let err = inv.accept(later).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvitationExpired);
        assert_eq!(inv.status, InvitationStatus::Pending);

        assert!(inv.mark_as_expired(later));
        assert_eq!(inv.status, InvitationStatus::Expired);
    }

    #[test]
    fn test_mark_as_expired_is_idempotent_noop() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let mut inv = invitation(now);

        assert!(!inv.mark_as_expired(now));
        assert_eq!(inv.status, InvitationStatus::Pending);

        inv.decline(now).unwrap();
        assert!(!inv.mark_as_expired(plus_days(now, 30)));
        assert_eq!(inv.status, InvitationStatus::Declined);

        let mut inv = invitation(now);
        let later = plus_days(now, 8);
        assert!(inv.mark_as_expired(later));
        assert!(!inv.mark_as_expired(later));
        assert_eq!(inv.status, InvitationStatus::Expired);
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        let now = DateTime::now();
        let terminal = [
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Expired,
            InvitationStatus::Cancelled,
        ];

        for status in terminal {
            let mut inv = invitation(now);
            inv.status = status;

            assert_eq!(inv.accept(now).unwrap_err().code(), ErrorCode::InvitationNotPending);
            assert_eq!(inv.decline(now).unwrap_err().code(), ErrorCode::InvitationNotPending);
            assert_eq!(inv.cancel(now).unwrap_err().code(), ErrorCode::InvitationNotPending);
            assert_eq!(inv.status, status);
            assert!(!inv.can_accept(now));
        }
    }

    #[test]
    fn test_accept_records_response_time() {
        let now = DateTime::now();
        let mut inv = invitation(now);
        inv.accept(now).unwrap();
        assert_eq!(inv.status, InvitationStatus::Accepted);
        assert_eq!(inv.responded_at, Some(now));
    }
}
