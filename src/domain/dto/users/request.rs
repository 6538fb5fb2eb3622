use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::dto::auth::request::validate_password_strength;
use crate::utils::string_utils::is_valid_nickname;

fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if !is_valid_nickname(nickname.trim()) {
        return Err(ValidationError::new("invalid_nickname")
            .with_message("닉네임은 2-16자의 한글, 영문, 숫자, 밑줄만 사용할 수 있습니다".into()));
    }
    Ok(())
}

/// 최초 닉네임 설정과 닉네임 변경에 공통으로 사용
#[derive(Debug, Deserialize, Validate)]
pub struct NicknameRequest {
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 64, message = "비밀번호는 8-64자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_validation() {
        let ok = NicknameRequest { nickname: "프로게이머_01".into() };
        assert!(ok.validate().is_ok());

        let short = NicknameRequest { nickname: "a".into() };
        assert!(short.validate().is_err());

        let symbols = NicknameRequest { nickname: "no spaces!".into() };
        assert!(symbols.validate().is_err());
    }
}
