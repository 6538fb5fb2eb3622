//! SMTP 메일 발송
//!
//! `SMTP_HOST`가 설정되지 않은 환경에서는 발송 대신 본문을 로그로 남깁니다.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use once_cell::sync::OnceCell;
use singleton_macro::service;

use crate::{
    config::{InvitationConfig, MailConfig, VerificationConfig},
    core::errors::{AppError, AppResult},
    domain::entities::verifications::VerificationType,
};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[service(name = "mail")]
pub struct MailService {
    /// SMTP 미설정이면 `None`
    transport: OnceCell<Option<SmtpTransport>>,
}

impl MailService {
    fn transport(&self) -> AppResult<Option<&SmtpTransport>> {
        let transport = self.transport.get_or_try_init(|| {
            let Some(host) = MailConfig::smtp_host() else {
                log::warn!("SMTP_HOST 미설정: 메일을 발송하지 않고 로그로 대신합니다");
                return Ok(None);
            };

            let transport = SmtpTransport::relay(&host)
                .map_err(|e| AppError::ExternalServiceError(format!("SMTP 설정 실패: {}", e)))?
                .port(MailConfig::smtp_port())
                .credentials(Credentials::new(
                    MailConfig::smtp_username(),
                    MailConfig::smtp_password(),
                ))
                .build();

            log::info!("SMTP 전송 준비 완료: {}:{}", host, MailConfig::smtp_port());
            Ok::<_, AppError>(Some(transport))
        })?;

        Ok(transport.as_ref())
    }

    /// 텍스트 메일 발송
    pub async fn send(&self, to: &str, subject: &str, body: String) -> AppResult<()> {
        let Some(transport) = self.transport()? else {
            log::info!("[메일 미발송] to={} subject={}\n{}", to, subject, body);
            return Ok(());
        };

        let message = Message::builder()
            .from(MailConfig::from_address().parse().map_err(|e| {
                AppError::InternalError(format!("발신 주소 형식 오류: {}", e))
            })?)
            .to(to.parse().map_err(|_| AppError::invalid_field("email", "이메일 형식이 올바르지 않습니다"))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::InternalError(format!("메일 생성 실패: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 발송 실패 ({}): {}", to, e)))?;

        log::debug!("메일 발송 완료: to={} subject={}", to, subject);
        Ok(())
    }

    pub async fn send_verification_code(
        &self,
        to: &str,
        verification_type: VerificationType,
        code: &str,
    ) -> AppResult<()> {
        self.send(
            to,
            verification_type.subject(),
            verification_body(code, VerificationConfig::expiration_minutes()),
        )
        .await
    }

    pub async fn send_team_invitation(&self, to: &str, team_name: &str, token: &str) -> AppResult<()> {
        self.send(
            to,
            &format!("[Team Manager] {} 팀 초대", team_name),
            invitation_body(team_name, &invitation_link(token), InvitationConfig::expiration_days()),
        )
        .await
    }
}

fn verification_body(code: &str, expiration_minutes: i64) -> String {
    format!(
        "인증 코드: {}\n\n이 코드는 {}분 동안 유효합니다.\n본인이 요청하지 않았다면 이 메일을 무시하세요.",
        code, expiration_minutes
    )
}

fn invitation_link(token: &str) -> String {
    format!(
        "{}/invitations/{}",
        MailConfig::app_base_url().trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

fn invitation_body(team_name: &str, link: &str, expiration_days: i64) -> String {
    format!(
        "{} 팀에서 초대장을 보냈습니다.\n\n아래 링크에서 수락하거나 거절할 수 있습니다.\n{}\n\n초대는 {}일 후 만료됩니다.",
        team_name, link, expiration_days
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_body_contains_code_and_ttl() {
        let body = verification_body("042117", 15);
        assert!(body.contains("042117"));
        assert!(body.contains("15분"));
    }

    #[test]
    fn test_invitation_link_ends_with_token() {
        let token = "0b7f3c5e-7f2a-4d1e-9d55-2f1c1b0c9a11";
        let link = invitation_link(token);
        assert!(link.ends_with(&format!("/invitations/{}", token)));

        let body = invitation_body("Night Owls", &link, 7);
        assert!(body.contains("Night Owls"));
        assert!(body.contains(&link));
    }
}
