//! 문자열 정규화 유틸리티
//!
//! 이메일은 소문자/트림으로, 닉네임과 팀 이름은 트림만 적용해 저장합니다.

use serde::Deserialize;
use crate::core::errors::AppError;

/// 필수 문자열을 트림하고 비어 있으면 필드 검증 에러를 반환합니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(
            field_name,
            format!("{}은(는) 필수입니다", field_name),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 이메일 비교/저장용 정규화
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 닉네임 허용 문자: 한글, 영문, 숫자, 밑줄
pub fn is_valid_nickname(nickname: &str) -> bool {
    let len = nickname.chars().count();
    (2..=16).contains(&len)
        && nickname
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  Alpha  ", "name").unwrap(), "Alpha");
        assert!(validate_required_string("   ", "name").is_err());
        assert!(validate_required_string("\t\n", "name").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  T1  ".to_string())), Some("T1".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Faker@Example.COM "), "faker@example.com");
    }

    #[test]
    fn test_nickname_rules() {
        assert!(is_valid_nickname("faker"));
        assert!(is_valid_nickname("페이커_01"));
        assert!(!is_valid_nickname("a"));
        assert!(!is_valid_nickname("has space"));
        assert!(!is_valid_nickname("this_nickname_is_too_long"));
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            description: Option<String>,
        }

        let p: Payload = serde_json::from_str(r#"{"description":"   "}"#).unwrap();
        assert_eq!(p.description, None);
        let p: Payload = serde_json::from_str(r#"{"description":" scrim team "}"#).unwrap();
        assert_eq!(p.description.as_deref(), Some("scrim team"));
    }
}
