use std::env;

use super::data_config::env_parse;

/// SMTP 발송 설정
///
/// `SMTP_HOST`가 비어 있으면 메일을 보내지 않고 본문을 로그로 남깁니다 (개발 환경).
pub struct MailConfig;

impl MailConfig {
    pub fn smtp_host() -> Option<String> {
        env::var("SMTP_HOST").ok().filter(|v| !v.is_empty())
    }

    pub fn smtp_port() -> u16 {
        env_parse("SMTP_PORT", 587)
    }

    pub fn smtp_username() -> String {
        env::var("SMTP_USERNAME").unwrap_or_default()
    }

    pub fn smtp_password() -> String {
        env::var("SMTP_PASSWORD").unwrap_or_default()
    }

    pub fn from_address() -> String {
        env::var("MAIL_FROM").unwrap_or_else(|_| "Team Manager <no-reply@localhost>".to_string())
    }

    /// 초대 링크 등 메일 본문에 들어가는 프론트엔드 주소
    pub fn app_base_url() -> String {
        env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string())
    }
}
