use serde::Deserialize;
use validator::{Validate, ValidationError};

/// 비밀번호 강도 검증: 영문자와 숫자를 모두 포함해야 합니다.
pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 영문자와 숫자를 모두 포함해야 합니다".into()));
    }
    Ok(())
}

fn validate_code_digits(code: &str) -> Result<(), ValidationError> {
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_code")
            .with_message("인증 코드는 숫자 6자리입니다".into()));
    }
    Ok(())
}

/// 이메일 회원가입 요청
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, max = 64, message = "비밀번호는 8-64자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

/// 로컬 로그인 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 인증 코드 발송 요청 (재발송, 잠금 해제, 휴면 해제, 비밀번호 재설정)
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

/// 이메일 + 인증 코드 확인 요청
#[derive(Debug, Deserialize, Validate)]
pub struct EmailCodeRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(equal = 6, message = "인증 코드는 숫자 6자리입니다"))]
    #[validate(custom(function = "validate_code_digits"))]
    pub code: String,
}

/// 비밀번호 재설정 확인 요청
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(equal = 6, message = "인증 코드는 숫자 6자리입니다"))]
    #[validate(custom(function = "validate_code_digits"))]
    pub code: String,

    #[validate(length(min = 8, max = 64, message = "비밀번호는 8-64자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// 리프레시 토큰 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// OAuth 콜백 쿼리 파라미터 구조체
///
/// 사용자가 동의를 거부하면 `code` 없이 `error`만 전달됩니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "player@example.com".into(),
            password: "secret123".into(),
        };
        assert!(ok.validate().is_ok());

        let weak = RegisterRequest {
            email: "player@example.com".into(),
            password: "onlyletters".into(),
        };
        let errors = weak.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let bad_email = RegisterRequest {
            email: "not-an-email".into(),
            password: "secret123".into(),
        };
        assert!(bad_email.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_code_must_be_six_digits() {
        let request = |code: &str| EmailCodeRequest {
            email: "player@example.com".into(),
            code: code.into(),
        };
        assert!(request("123456").validate().is_ok());
        assert!(request("12345").validate().is_err());
        assert!(request("12a456").validate().is_err());
    }
}
