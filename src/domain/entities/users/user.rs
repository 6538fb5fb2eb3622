//! # 사용자 엔티티와 계정 상태 머신
//!
//! ```text
//!                verify_email()            set_initial_nickname()
//! PENDING_EMAIL ───────────────▶ PENDING_NICKNAME ───────────────▶ ACTIVE
//!                                                                 │  ▲  │  ▲
//!                                       login_failed() x5         │  │  │  │ reactivate()
//!                                  ┌──────────────────────────────┘  │  │  │
//!                                  ▼                unlock()         │  ▼  │
//!                                LOCKED ─────────────────────────────┘ DORMANT
//!                                                  mark_as_dormant() (180일 미접속)
//! ```
//!
//! 상태 전이는 모두 이 파일의 메서드를 통해서만 일어나며, 허용되지 않은 전이는
//! `InvalidState` 에러를 돌려줍니다. 시간에 의존하는 메서드는 `now`를 인자로 받습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::core::errors::{AppResult, ErrorCode};
use crate::utils::time::elapsed_days;

/// 연속 로그인 실패 허용 횟수
pub const MAX_LOGIN_FAILURES: u32 = 5;
/// 닉네임 변경 주기 (일)
pub const NICKNAME_CHANGE_COOLDOWN_DAYS: i64 = 30;
/// 휴면 전환 기준 미접속 기간 (일)
pub const DORMANT_AFTER_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    PendingEmail,
    PendingNickname,
    Active,
    Locked,
    Dormant,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::PendingEmail => "PENDING_EMAIL",
            AccountStatus::PendingNickname => "PENDING_NICKNAME",
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Locked => "LOCKED",
            AccountStatus::Dormant => "DORMANT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// 소문자로 정규화된 이메일 (유니크)
    pub email: String,

    /// OAuth 사용자는 비밀번호가 없습니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// 설정된 경우 유니크
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    pub status: AccountStatus,

    pub auth_provider: AuthProvider,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    pub roles: Vec<String>,

    #[serde(default)]
    pub login_fail_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname_changed_at: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dormant_at: Option<DateTime>,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 이메일 가입 사용자. 이메일 인증 전 상태로 시작합니다.
    pub fn new_email(email: String, password_hash: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            email,
            password_hash: Some(password_hash),
            nickname: None,
            status: AccountStatus::PendingEmail,
            auth_provider: AuthProvider::Email,
            provider_id: None,
            roles: vec!["user".to_string()],
            login_fail_count: 0,
            nickname_changed_at: None,
            last_login_at: None,
            locked_at: None,
            dormant_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// OAuth 가입 사용자. 이메일은 제공자가 확인했으므로 닉네임 설정 단계부터 시작합니다.
    pub fn new_oauth(email: String, auth_provider: AuthProvider, provider_id: String) -> Self {
        let mut user = Self::new_email(email, String::new());
        user.password_hash = None;
        user.auth_provider = auth_provider;
        user.provider_id = Some(provider_id);
        user.status = AccountStatus::PendingNickname;
        user
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn can_authenticate_with_password(&self) -> bool {
        self.auth_provider == AuthProvider::Email && self.password_hash.is_some()
    }

    fn require_status(&self, expected: AccountStatus, code: ErrorCode) -> AppResult<()> {
        if self.status != expected {
            return Err(code.with_message(format!(
                "{} (현재 상태: {})",
                code.message(),
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// PENDING_EMAIL → PENDING_NICKNAME
    pub fn verify_email(&mut self) -> AppResult<()> {
        self.require_status(AccountStatus::PendingEmail, ErrorCode::InvalidAccountStatus)?;
        self.status = AccountStatus::PendingNickname;
        self.updated_at = DateTime::now();
        Ok(())
    }

    /// PENDING_NICKNAME → ACTIVE
    ///
    /// 최초 설정은 변경 주기 계산에 포함되지 않습니다.
    pub fn set_initial_nickname(&mut self, nickname: String) -> AppResult<()> {
        self.require_status(AccountStatus::PendingNickname, ErrorCode::InvalidAccountStatus)?;
        self.nickname = Some(nickname);
        self.status = AccountStatus::Active;
        self.updated_at = DateTime::now();
        Ok(())
    }

    /// 닉네임 변경. ACTIVE 상태에서 30일에 한 번만 허용됩니다.
    pub fn update_nickname(&mut self, nickname: String, now: DateTime) -> AppResult<()> {
        self.require_status(AccountStatus::Active, ErrorCode::InvalidAccountStatus)?;

        let remaining = self.nickname_cooldown_remaining_days(now);
        if remaining > 0 {
            return Err(ErrorCode::NicknameChangeCooldown.with_message(format!(
                "닉네임은 {}일에 한 번만 변경할 수 있습니다. {}일 후에 다시 시도해주세요",
                NICKNAME_CHANGE_COOLDOWN_DAYS, remaining
            )));
        }

        self.nickname = Some(nickname);
        self.nickname_changed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// 다음 닉네임 변경까지 남은 일 수 (0이면 변경 가능)
    pub fn nickname_cooldown_remaining_days(&self, now: DateTime) -> i64 {
        match self.nickname_changed_at {
            Some(changed_at) => {
                (NICKNAME_CHANGE_COOLDOWN_DAYS - elapsed_days(changed_at, now)).max(0)
            }
            None => 0,
        }
    }

    pub fn login_success(&mut self, now: DateTime) {
        self.login_fail_count = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// 로그인 실패 기록
    ///
    /// ACTIVE 상태에서만 카운트하며, 이번 실패로 잠겼으면 `true`를 반환합니다.
    /// 이미 LOCKED인 계정은 카운트하지 않습니다.
    pub fn login_failed(&mut self, now: DateTime) -> bool {
        if self.status != AccountStatus::Active {
            return false;
        }

        self.login_fail_count += 1;
        self.updated_at = now;

        if self.login_fail_count >= MAX_LOGIN_FAILURES {
            self.status = AccountStatus::Locked;
            self.locked_at = Some(now);
            return true;
        }
        false
    }

    /// LOCKED → ACTIVE
    pub fn unlock(&mut self) -> AppResult<()> {
        self.require_status(AccountStatus::Locked, ErrorCode::AccountNotLocked)?;
        self.status = AccountStatus::Active;
        self.login_fail_count = 0;
        self.locked_at = None;
        self.updated_at = DateTime::now();
        Ok(())
    }

    /// 마지막 로그인(없으면 가입 시각)으로부터 180일 이상 지난 ACTIVE 계정
    pub fn is_dormant_candidate(&self, now: DateTime) -> bool {
        let last_seen = self.last_login_at.unwrap_or(self.created_at);
        self.status == AccountStatus::Active && elapsed_days(last_seen, now) >= DORMANT_AFTER_DAYS
    }

    /// ACTIVE → DORMANT
    pub fn mark_as_dormant(&mut self, now: DateTime) -> AppResult<()> {
        self.require_status(AccountStatus::Active, ErrorCode::InvalidAccountStatus)?;
        self.status = AccountStatus::Dormant;
        self.dormant_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// DORMANT → ACTIVE
    ///
    /// 재활성화 시점을 마지막 접속으로 기록해 곧바로 다시 휴면 대상이 되지 않게 합니다.
    pub fn reactivate(&mut self, now: DateTime) -> AppResult<()> {
        self.require_status(AccountStatus::Dormant, ErrorCode::AccountNotDormant)?;
        self.status = AccountStatus::Active;
        self.dormant_at = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// 비밀번호 재설정. 실패 카운트도 함께 초기화합니다.
    pub fn change_password(&mut self, password_hash: String) {
        self.password_hash = Some(password_hash);
        self.login_fail_count = 0;
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;
    use crate::utils::time::{plus_days, plus_minutes};

    fn active_user() -> User {
        let mut user = User::new_email("player@example.com".into(), "hash".into());
        user.verify_email().unwrap();
        user.set_initial_nickname("player".into()).unwrap();
        user
    }

    fn assert_code(result: AppResult<()>, expected: ErrorCode) {
        match result {
            Err(e) => assert_eq!(e.code(), expected),
            Ok(_) => panic!("expected {:?}", expected),
        }
    }

    #[test]
    fn test_signup_flow_reaches_active() {
        let mut user = User::new_email("a@b.gg".into(), "hash".into());
        assert_eq!(user.status, AccountStatus::PendingEmail);

        assert_code(user.set_initial_nickname("early".into()), ErrorCode::InvalidAccountStatus);

        user.verify_email().unwrap();
        assert_eq!(user.status, AccountStatus::PendingNickname);
        assert_code(user.verify_email(), ErrorCode::InvalidAccountStatus);

        user.set_initial_nickname("faker".into()).unwrap();
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(user.nickname.as_deref(), Some("faker"));
        assert!(user.nickname_changed_at.is_none());
    }

    #[test]
    fn test_oauth_user_starts_at_nickname_step() {
        let user = User::new_oauth("k@kakao.com".into(), AuthProvider::Kakao, "12345".into());
        assert_eq!(user.status, AccountStatus::PendingNickname);
        assert!(user.password_hash.is_none());
        assert!(!user.can_authenticate_with_password());
    }

    #[test]
    fn test_first_nickname_change_is_allowed() {
        let mut user = active_user();
        let now = DateTime::now();
        user.update_nickname("renamed".into(), now).unwrap();
        assert_eq!(user.nickname.as_deref(), Some("renamed"));
        assert_eq!(user.nickname_changed_at, Some(now));
    }

    #[test]
    fn test_nickname_change_requires_thirty_days() {
        let mut user = active_user();
        let changed = DateTime::from_millis(1_700_000_000_000);
        user.update_nickname("first".into(), changed).unwrap();

        let after_18_days = plus_days(changed, 18);
        let err = user.update_nickname("second".into(), after_18_days).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NicknameChangeCooldown);
        assert!(err.to_string().contains("12일"));
        assert_eq!(user.nickname.as_deref(), Some("first"));

        let almost = plus_minutes(plus_days(changed, 29), 23 * 60);
        assert_eq!(user.nickname_cooldown_remaining_days(almost), 1);
        assert!(user.update_nickname("second".into(), almost).is_err());

        let after_30_days = plus_days(changed, 30);
        user.update_nickname("second".into(), after_30_days).unwrap();
        assert_eq!(user.nickname.as_deref(), Some("second"));
    }

    #[test]
    fn test_nickname_change_requires_active() {
        let mut user = active_user();
        user.status = AccountStatus::Locked;
        assert_code(
            user.update_nickname("x".into(), DateTime::now()),
            ErrorCode::InvalidAccountStatus,
        );
    }

    #[test]
    fn test_five_failures_lock_the_account() {
        let mut user = active_user();
        let now = DateTime::now();

        for _ in 0..4 {
            assert!(!user.login_failed(now));
        }
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(user.login_fail_count, 4);

        assert!(user.login_failed(now));
        assert_eq!(user.status, AccountStatus::Locked);
        assert_eq!(user.login_fail_count, 5);
        assert_eq!(user.locked_at, Some(now));
    }

    #[test]
    fn test_failures_while_locked_do_not_count() {
        let mut user = active_user();
        let now = DateTime::now();
        for _ in 0..5 {
            user.login_failed(now);
        }

        assert!(!user.login_failed(now));
        assert!(!user.login_failed(now));
        assert_eq!(user.login_fail_count, 5);
        assert_eq!(user.status, AccountStatus::Locked);
    }

    #[test]
    fn test_success_resets_counter() {
        let mut user = active_user();
        let now = DateTime::now();
        user.login_failed(now);
        user.login_failed(now);
        user.login_success(now);
        assert_eq!(user.login_fail_count, 0);
        assert_eq!(user.last_login_at, Some(now));
    }

    #[test]
    fn test_unlock() {
        let mut user = active_user();
        assert_code(user.unlock(), ErrorCode::AccountNotLocked);

        let now = DateTime::now();
        for _ in 0..5 {
            user.login_failed(now);
        }
        user.unlock().unwrap();
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(user.login_fail_count, 0);
        assert!(user.locked_at.is_none());
    }

    #[test]
    fn test_dormancy_cycle() {
        let mut user = active_user();
        let last_login = DateTime::from_millis(1_600_000_000_000);
        user.login_success(last_login);

        assert!(!user.is_dormant_candidate(plus_days(last_login, 179)));
        let later = plus_days(last_login, 180);
        assert!(user.is_dormant_candidate(later));

        user.mark_as_dormant(later).unwrap();
        assert_eq!(user.status, AccountStatus::Dormant);
        assert!(!user.is_dormant_candidate(later));
        assert_code(user.mark_as_dormant(later), ErrorCode::InvalidAccountStatus);

        user.reactivate(later).unwrap();
        assert_eq!(user.status, AccountStatus::Active);
        assert!(!user.is_dormant_candidate(later));
        assert_code(user.reactivate(later), ErrorCode::AccountNotDormant);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&AccountStatus::PendingNickname).unwrap();
        assert_eq!(json, "\"PENDING_NICKNAME\"");
        assert_eq!(AccountStatus::Dormant.as_str(), "DORMANT");
    }

    #[test]
    fn test_invalid_transition_is_conflict() {
        let mut user = active_user();
        let err = user.verify_email().unwrap_err();
        assert!(matches!(err, AppError::InvalidState(ErrorCode::InvalidAccountStatus, _)));
    }
}
