use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::teams::TeamRole;
use crate::utils::string_utils::deserialize_optional_string;

fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new("invalid_tag")
            .with_message("팀 태그는 영문과 숫자만 사용할 수 있습니다".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 2, max = 30, message = "팀 이름은 2-30자 사이여야 합니다"))]
    pub name: String,

    #[validate(length(min = 2, max = 5, message = "팀 태그는 2-5자 사이여야 합니다"))]
    #[validate(custom(function = "validate_tag"))]
    pub tag: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 500, message = "팀 소개는 500자 이하여야 합니다"))]
    pub description: Option<String>,
}

/// 부분 수정. 생략한 필드는 유지됩니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 2, max = 30, message = "팀 이름은 2-30자 사이여야 합니다"))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 5, message = "팀 태그는 2-5자 사이여야 합니다"))]
    #[validate(custom(function = "validate_tag"))]
    pub tag: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 500, message = "팀 소개는 500자 이하여야 합니다"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: TeamRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferOwnershipRequest {
    #[validate(length(min = 1, message = "새 소유자 ID가 필요합니다"))]
    pub new_owner_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_request_validation() {
        let request: CreateTeamRequest =
            serde_json::from_str(r#"{"name": "Night Owls", "tag": "NOW", "description": "   "}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.description, None);

        let bad_tag: CreateTeamRequest =
            serde_json::from_str(r#"{"name": "Night Owls", "tag": "N-W"}"#).unwrap();
        assert!(bad_tag.validate().unwrap_err().field_errors().contains_key("tag"));
    }

    #[test]
    fn test_change_role_wire_format() {
        let request: ChangeRoleRequest = serde_json::from_str(r#"{"role": "LEADER"}"#).unwrap();
        assert_eq!(request.role, TeamRole::Leader);
        assert!(serde_json::from_str::<ChangeRoleRequest>(r#"{"role": "captain"}"#).is_err());
    }
}
