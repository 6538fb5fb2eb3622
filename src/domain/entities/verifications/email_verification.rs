use mongodb::bson::{oid::ObjectId, DateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppResult, ErrorCode};

/// 인증 코드 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationType {
    Signup,
    PasswordReset,
    DormantReactivation,
    UnlockAccount,
}

impl VerificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::Signup => "SIGNUP",
            VerificationType::PasswordReset => "PASSWORD_RESET",
            VerificationType::DormantReactivation => "DORMANT_REACTIVATION",
            VerificationType::UnlockAccount => "UNLOCK_ACCOUNT",
        }
    }

    /// 메일 제목
    pub fn subject(&self) -> &'static str {
        match self {
            VerificationType::Signup => "[Team Manager] 회원가입 인증 코드",
            VerificationType::PasswordReset => "[Team Manager] 비밀번호 재설정 인증 코드",
            VerificationType::DormantReactivation => "[Team Manager] 휴면 계정 해제 인증 코드",
            VerificationType::UnlockAccount => "[Team Manager] 계정 잠금 해제 인증 코드",
        }
    }
}

/// 이메일 인증 코드 (6자리, 1회용)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub code: String,
    pub verification_type: VerificationType,
    pub expires_at: DateTime,
    #[serde(default)]
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl EmailVerification {
    pub fn new(email: String, verification_type: VerificationType, expires_at: DateTime) -> Self {
        Self {
            id: None,
            email,
            code: Self::generate_code(),
            verification_type,
            expires_at,
            attempts: 0,
            used_at: None,
            created_at: DateTime::now(),
        }
    }

    pub fn generate_code() -> String {
        let mut rng = rand::rng();
        format!("{:06}", rng.random_range(0..1_000_000u32))
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        now > self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// 코드 확인
    ///
    /// 불일치 시 시도 횟수를 올리므로, 호출자는 성공/실패와 무관하게 결과를 저장해야 합니다.
    pub fn confirm(&mut self, code: &str, now: DateTime, max_attempts: u32) -> AppResult<()> {
        if self.is_used() {
            return Err(ErrorCode::VerificationNotFound.error());
        }
        if self.is_expired(now) {
            return Err(ErrorCode::VerificationExpired.error());
        }
        if self.attempts >= max_attempts {
            return Err(ErrorCode::VerificationAttemptsExceeded.error());
        }
        if self.code != code.trim() {
            self.attempts += 1;
            return Err(ErrorCode::VerificationCodeMismatch.error());
        }

        self.used_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::plus_minutes;

    fn verification(now: DateTime) -> EmailVerification {
        let mut v = EmailVerification::new(
            "player@example.com".into(),
            VerificationType::Signup,
            plus_minutes(now, 15),
        );
        v.code = "123456".into();
        v
    }

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..50 {
            let code = EmailVerification::generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_confirm_success_is_single_use() {
        let now = DateTime::now();
        let mut v = verification(now);

        v.confirm("123456", now, 5).unwrap();
        assert!(v.is_used());
        assert_eq!(
            v.confirm("123456", now, 5).unwrap_err().code(),
            ErrorCode::VerificationNotFound
        );
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let now = DateTime::now();
        let mut v = verification(now);
        let later = plus_minutes(now, 16);

        assert_eq!(
            v.confirm("123456", later, 5).unwrap_err().code(),
            ErrorCode::VerificationExpired
        );
        assert!(!v.is_used());
    }

    #[test]
    fn test_wrong_codes_count_until_limit() {
        let now = DateTime::now();
        let mut v = verification(now);

        for _ in 0..5 {
            assert_eq!(
                v.confirm("000000", now, 5).unwrap_err().code(),
                ErrorCode::VerificationCodeMismatch
            );
        }
        assert_eq!(v.attempts, 5);
        assert_eq!(
            v.confirm("123456", now, 5).unwrap_err().code(),
            ErrorCode::VerificationAttemptsExceeded
        );
    }

    #[test]
    fn test_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&VerificationType::DormantReactivation).unwrap(),
            "\"DORMANT_REACTIVATION\""
        );
        assert_eq!(VerificationType::UnlockAccount.as_str(), "UNLOCK_ACCOUNT");
    }
}
