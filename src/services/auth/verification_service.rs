use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    config::VerificationConfig,
    core::errors::{AppResult, ErrorCode},
    domain::entities::verifications::{EmailVerification, VerificationType},
    repositories::verifications::VerificationRepository,
    services::mail::MailService,
    utils::time::plus_minutes,
};

/// 이메일 인증 코드 발급/확인
///
/// 같은 이메일/용도로 새 코드를 발급하면 이전 미사용 코드는 무효가 됩니다.
#[service(name = "verification")]
pub struct VerificationService {
    verification_repo: Arc<VerificationRepository>,

    mail_service: Arc<MailService>,
}

impl VerificationService {
    pub async fn issue(&self, email: &str, verification_type: VerificationType) -> AppResult<()> {
        self.verification_repo.delete_unused(email, verification_type).await?;

        let verification = self.verification_repo
            .create(EmailVerification::new(
                email.to_string(),
                verification_type,
                plus_minutes(DateTime::now(), VerificationConfig::expiration_minutes()),
            ))
            .await?;

        log::info!("인증 코드 발급: email={} type={}", email, verification_type.as_str());

        self.mail_service
            .send_verification_code(email, verification_type, &verification.code)
            .await
    }

    /// 코드 확인. 불일치여도 시도 횟수는 저장됩니다.
    pub async fn confirm(&self, email: &str, verification_type: VerificationType, code: &str) -> AppResult<()> {
        let mut verification = self.verification_repo
            .find_latest_unused(email, verification_type)
            .await?
            .ok_or_else(|| ErrorCode::VerificationNotFound.error())?;

        let result = verification.confirm(code, DateTime::now(), VerificationConfig::max_attempts());
        if let Err(e) = &result {
            if e.code() != ErrorCode::VerificationCodeMismatch {
                return result;
            }
            log::warn!(
                "인증 코드 불일치: email={} type={} attempts={}",
                email, verification_type.as_str(), verification.attempts
            );
        }

        self.verification_repo.save(&verification).await?;
        result
    }

    pub async fn purge_expired(&self, now: DateTime) -> AppResult<u64> {
        self.verification_repo.delete_expired(now).await
    }
}
