use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 팀 내 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamRole {
    Owner,
    Leader,
    Member,
}

impl TeamRole {
    /// 팀 정보 수정, 초대, 스크림 주최
    pub fn can_manage(&self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Leader)
    }

    /// 역할 변경과 소유권 이전은 소유자만 가능
    pub fn can_change_roles(&self) -> bool {
        *self == TeamRole::Owner
    }

    /// 소유자는 소유자 외 모두, 리더는 일반 멤버만 내보낼 수 있습니다.
    pub fn can_remove(&self, target: TeamRole) -> bool {
        match (self, target) {
            (_, TeamRole::Owner) => false,
            (TeamRole::Owner, _) => true,
            (TeamRole::Leader, TeamRole::Member) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 유니크
    pub name: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Team {
    pub fn new(name: String, tag: String, description: Option<String>, owner_id: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name,
            tag: tag.to_uppercase(),
            description,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(TeamRole::Owner.can_manage());
        assert!(TeamRole::Leader.can_manage());
        assert!(!TeamRole::Member.can_manage());

        assert!(TeamRole::Owner.can_change_roles());
        assert!(!TeamRole::Leader.can_change_roles());
    }

    #[test]
    fn test_remove_rules() {
        assert!(TeamRole::Owner.can_remove(TeamRole::Leader));
        assert!(TeamRole::Owner.can_remove(TeamRole::Member));
        assert!(!TeamRole::Owner.can_remove(TeamRole::Owner));
        assert!(TeamRole::Leader.can_remove(TeamRole::Member));
        assert!(!TeamRole::Leader.can_remove(TeamRole::Leader));
        assert!(!TeamRole::Member.can_remove(TeamRole::Member));
    }

    #[test]
    fn test_tag_is_uppercased() {
        let team = Team::new("Scrim Squad".into(), "ssq".into(), None, "u1".into());
        assert_eq!(team.tag, "SSQ");
    }
}
