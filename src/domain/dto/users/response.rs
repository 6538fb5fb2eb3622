use serde::Serialize;

use crate::domain::entities::users::User;
use crate::utils::time::to_rfc3339;

/// 본인 프로필 응답 (민감 정보 제외)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub nickname: Option<String>,
    pub status: String,
    pub auth_provider: String,
    pub roles: Vec<String>,
    pub nickname_changed_at: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            status: user.status.as_str().to_string(),
            auth_provider: user.auth_provider.as_str().to_string(),
            roles: user.roles.clone(),
            nickname_changed_at: user.nickname_changed_at.map(to_rfc3339),
            last_login_at: user.last_login_at.map(to_rfc3339),
            created_at: to_rfc3339(user.created_at),
        }
    }
}

/// 다른 사용자에게 보이는 공개 프로필
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub created_at: String,
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            nickname: user.nickname.clone(),
            created_at: to_rfc3339(user.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_user_response_hides_password_hash() {
        let mut user = User::new_email("player@example.com".into(), "$2b$hash".into());
        user.id = Some(ObjectId::new());

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(json["status"], "PENDING_EMAIL");
        assert_eq!(json["auth_provider"], "EMAIL");
        assert!(json.get("password_hash").is_none());
    }
}
