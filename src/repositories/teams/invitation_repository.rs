use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, DateTime, Document}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult},
    core::registry::Repository,
    db::{parse_object_id, Database},
    domain::entities::teams::{InvitationStatus, TeamInvitation},
};

const PENDING: &str = "PENDING";

fn status_value(status: InvitationStatus) -> &'static str {
    match status {
        InvitationStatus::Pending => PENDING,
        InvitationStatus::Accepted => "ACCEPTED",
        InvitationStatus::Declined => "DECLINED",
        InvitationStatus::Expired => "EXPIRED",
        InvitationStatus::Cancelled => "CANCELLED",
    }
}

/// `from` 상태일 때만 현재 상태로 바꾸는 (filter, update) 쌍
fn transition_update(invitation: &TeamInvitation, from: InvitationStatus) -> AppResult<(Document, Document)> {
    let object_id = invitation.id
        .ok_or_else(|| AppError::InternalError("저장되지 않은 초대입니다".to_string()))?;

    let filter = doc! { "_id": object_id, "status": status_value(from) };
    let update = match invitation.responded_at {
        Some(responded_at) => doc! {
            "$set": { "status": status_value(invitation.status), "responded_at": responded_at },
        },
        None => doc! {
            "$set": { "status": status_value(invitation.status) },
            "$unset": { "responded_at": "" },
        },
    };
    Ok((filter, update))
}

#[repository(name = "invitation", collection = "team_invitations")]
pub struct InvitationRepository {
    db: Arc<Database>,
}

impl InvitationRepository {
    pub async fn create(&self, mut invitation: TeamInvitation) -> AppResult<TeamInvitation> {
        let result = self.collection::<TeamInvitation>()
            .insert_one(&invitation)
            .await?;

        invitation.id = result.inserted_id.as_object_id();
        Ok(invitation)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<TeamInvitation>> {
        let object_id = parse_object_id(id)?;
        Ok(self.collection::<TeamInvitation>()
            .find_one(doc! { "_id": object_id })
            .await?)
    }

    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<TeamInvitation>> {
        Ok(self.collection::<TeamInvitation>()
            .find_one(doc! { "token": token })
            .await?)
    }

    /// 같은 팀/이메일로 아직 유효한 초대
    pub async fn find_live_pending(
        &self,
        team_id: &str,
        email: &str,
        now: DateTime,
    ) -> AppResult<Option<TeamInvitation>> {
        Ok(self.collection::<TeamInvitation>()
            .find_one(doc! {
                "team_id": team_id,
                "invitee_email": email,
                "status": PENDING,
                "expires_at": { "$gt": now },
            })
            .await?)
    }

    pub async fn find_by_team(&self, team_id: &str) -> AppResult<Vec<TeamInvitation>> {
        let cursor = self.collection::<TeamInvitation>()
            .find(doc! { "team_id": team_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_live_pending_by_email(&self, email: &str, now: DateTime) -> AppResult<Vec<TeamInvitation>> {
        let cursor = self.collection::<TeamInvitation>()
            .find(doc! {
                "invitee_email": email,
                "status": PENDING,
                "expires_at": { "$gt": now },
            })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// 저장된 상태가 `from`일 때만 전이를 기록합니다.
    ///
    /// 다른 요청이 먼저 상태를 바꿨다면 `false`를 반환하고 아무것도 쓰지 않습니다.
    pub async fn save_transition(&self, invitation: &TeamInvitation, from: InvitationStatus) -> AppResult<bool> {
        let (filter, update) = transition_update(invitation, from)?;
        let result = self.collection::<TeamInvitation>()
            .update_one(filter, update)
            .await?;
        Ok(result.matched_count > 0)
    }

    /// 만료 시각이 지난 PENDING 초대를 EXPIRED로 일괄 전환합니다.
    pub async fn expire_overdue(&self, now: DateTime) -> AppResult<u64> {
        let result = self.collection::<TeamInvitation>()
            .update_many(
                doc! { "status": PENDING, "expires_at": { "$lt": now } },
                doc! { "$set": { "status": "EXPIRED" } },
            )
            .await?;
        Ok(result.modified_count)
    }

    pub async fn delete_by_team(&self, team_id: &str) -> AppResult<u64> {
        let result = self.collection::<TeamInvitation>()
            .delete_many(doc! { "team_id": team_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let token_index = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("token_unique".to_string())
                .build())
            .build();

        let pending_index = IndexModel::builder()
            .keys(doc! { "invitee_email": 1, "status": 1 })
            .options(IndexOptions::builder()
                .name("invitee_status".to_string())
                .build())
            .build();

        let team_index = IndexModel::builder()
            .keys(doc! { "team_id": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("team_created".to_string())
                .build())
            .build();

        self.collection::<TeamInvitation>()
            .create_indexes([token_index, pending_index, team_index])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use crate::utils::time::plus_days;

    fn stored_invitation() -> TeamInvitation {
        let mut invitation = TeamInvitation::new(
            "team".into(),
            "Night Owls".into(),
            "invitee@example.com".into(),
            "inviter".into(),
            plus_days(DateTime::now(), 7),
        );
        invitation.id = Some(ObjectId::new());
        invitation
    }

    #[test]
    fn test_status_value_matches_serde() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Expired,
            InvitationStatus::Cancelled,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), status_value(status));
        }
    }

    #[test]
    fn test_transition_only_matches_pending_document() {
        let mut invitation = stored_invitation();
        let now = DateTime::now();
        invitation.accept(now).unwrap();

        let (filter, update) = transition_update(&invitation, InvitationStatus::Pending).unwrap();

        assert_eq!(filter.get_object_id("_id").unwrap(), invitation.id.unwrap());
        assert_eq!(filter.get_str("status").unwrap(), "PENDING");

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "ACCEPTED");
        assert_eq!(set.get_datetime("responded_at").unwrap(), &now);
    }

    #[test]
    fn test_reopen_clears_responded_at() {
        let invitation = stored_invitation();

        let (filter, update) = transition_update(&invitation, InvitationStatus::Accepted).unwrap();

        assert_eq!(filter.get_str("status").unwrap(), "ACCEPTED");
        assert_eq!(update.get_document("$set").unwrap().get_str("status").unwrap(), "PENDING");
        assert!(update.get_document("$unset").unwrap().contains_key("responded_at"));
    }

    #[test]
    fn test_unsaved_invitation_cannot_transition() {
        let mut invitation = stored_invitation();
        invitation.id = None;

        assert!(transition_update(&invitation, InvitationStatus::Pending).is_err());
    }
}
