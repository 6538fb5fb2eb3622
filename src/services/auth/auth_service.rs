//! # 이메일 계정 인증 흐름
//!
//! ```text
//! register ─▶ (SIGNUP 코드 메일) ─▶ verify_email ─▶ 닉네임 설정 ─▶ login
//!                                                              │
//!            5회 실패 ─▶ LOCKED ─▶ request_unlock / confirm_unlock
//!            180일 미접속 ─▶ DORMANT ─▶ request_reactivation / confirm_reactivation
//! ```
//!
//! 계정 상태 전이 자체는 [`User`] 엔티티가 담당하고, 이 서비스는 저장소/메일/토큰을 엮습니다.

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    config::PasswordConfig,
    core::errors::{AppError, AppResult, ErrorCode},
    domain::dto::auth::{AuthResponse, RegisterResponse},
    domain::dto::users::UserResponse,
    domain::entities::tokens::BlacklistReason,
    domain::entities::users::{AccountStatus, User},
    domain::entities::verifications::VerificationType,
    domain::models::auth::AuthenticatedUser,
    domain::models::token::TokenPair,
    repositories::users::UserRepository,
    services::auth::{TokenService, VerificationService},
    utils::string_utils::normalize_email,
};

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, PasswordConfig::bcrypt_cost())
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))
}

pub(crate) fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))
}

/// 로그인/토큰 갱신이 가능한 상태인지 확인합니다.
///
/// PENDING_NICKNAME은 닉네임 설정을 위해 로그인이 허용됩니다.
pub(crate) fn check_login_status(user: &User) -> AppResult<()> {
    match user.status {
        AccountStatus::Active | AccountStatus::PendingNickname => Ok(()),
        AccountStatus::PendingEmail => Err(ErrorCode::EmailNotVerified.error()),
        AccountStatus::Locked => Err(ErrorCode::AccountLocked.error()),
        AccountStatus::Dormant => Err(ErrorCode::AccountDormant.error()),
    }
}

/// 비밀번호 불일치를 기록하고 응답할 에러를 고릅니다.
///
/// 잠금을 일으킨 실패부터 ACCOUNT_LOCKED입니다. 호출자는 바뀐 `user`를 저장해야 합니다.
pub(crate) fn record_failed_login(user: &mut User, now: DateTime) -> AppError {
    if user.login_failed(now) {
        log::warn!("로그인 실패 누적으로 계정 잠금: {}", user.email);
        return ErrorCode::AccountLocked.error();
    }
    log::info!("로그인 실패: {} ({}회)", user.email, user.login_fail_count);
    ErrorCode::InvalidCredentials.error()
}

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,

    token_service: Arc<TokenService>,

    verification_service: Arc<VerificationService>,
}

impl AuthService {
    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| ErrorCode::UserNotFound.error())
    }

    /// 이메일 회원가입
    ///
    /// 아직 이메일 인증 전인 계정으로 다시 가입하면 비밀번호를 갱신하고 코드를 재발송합니다.
    pub async fn register(&self, email: &str, password: &str) -> AppResult<RegisterResponse> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(mut pending)
                if pending.status == AccountStatus::PendingEmail && pending.can_authenticate_with_password() =>
            {
                pending.change_password(password_hash);
                self.user_repo.save(&pending).await?;
                log::info!("인증 대기 계정 재가입: {}", email);
                pending
            }
            Some(_) => return Err(ErrorCode::EmailAlreadyExists.error()),
            None => {
                let created = self.user_repo.create(User::new_email(email.clone(), password_hash)).await?;
                log::info!("이메일 회원가입: {}", email);
                created
            }
        };

        self.verification_service.issue(&email, VerificationType::Signup).await?;

        Ok(RegisterResponse {
            user_id: user.id_string().unwrap_or_default(),
            email: user.email,
            status: user.status.as_str().to_string(),
        })
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> AppResult<UserResponse> {
        let mut user = self.find_by_email(email).await?;
        if user.status != AccountStatus::PendingEmail {
            return Err(ErrorCode::InvalidAccountStatus.error());
        }

        self.verification_service
            .confirm(&user.email, VerificationType::Signup, code)
            .await?;

        user.verify_email()?;
        self.user_repo.save(&user).await?;

        log::info!("이메일 인증 완료: {}", user.email);
        Ok(UserResponse::from(&user))
    }

    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let user = self.find_by_email(email).await?;
        if user.status != AccountStatus::PendingEmail {
            return Err(ErrorCode::InvalidAccountStatus.error());
        }

        self.verification_service.issue(&user.email, VerificationType::Signup).await
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 상태 확인이 비밀번호 확인보다 먼저입니다. LOCKED 계정은 실패 횟수가 늘지 않습니다.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let mut user = self.user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| ErrorCode::InvalidCredentials.error())?;

        let password_hash = match (&user.password_hash, user.can_authenticate_with_password()) {
            (Some(hash), true) => hash.clone(),
            _ => {
                return Err(ErrorCode::InvalidCredentials.with_message(format!(
                    "{} 계정입니다. 해당 로그인 방식을 이용해주세요",
                    user.auth_provider.as_str()
                )));
            }
        };

        check_login_status(&user)?;

        let now = DateTime::now();
        if !verify_password(password, &password_hash)? {
            let err = record_failed_login(&mut user, now);
            self.user_repo.save(&user).await?;
            return Err(err);
        }

        user.login_success(now);
        self.user_repo.save(&user).await?;

        let tokens = self.token_service.issue_pair(&user).await?;
        log::info!("로그인 성공: {}", user.email);

        Ok(AuthResponse {
            user: UserResponse::from(&user),
            tokens,
        })
    }

    /// 리프레시 토큰 회전
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let user_id = self.token_service.rotate_refresh(refresh_token).await?;

        let user = self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ErrorCode::InvalidToken.error())?;
        check_login_status(&user)?;

        self.token_service.issue_pair(&user).await
    }

    pub async fn logout(&self, auth_user: &AuthenticatedUser) -> AppResult<()> {
        self.token_service.revoke_access(auth_user, BlacklistReason::Logout).await?;
        let revoked = self.token_service.revoke_all_refresh(&auth_user.user_id).await?;

        log::info!("로그아웃: user_id={} (리프레시 토큰 {}개 폐기)", auth_user.user_id, revoked);
        Ok(())
    }

    pub async fn request_unlock(&self, email: &str) -> AppResult<()> {
        let user = self.find_by_email(email).await?;
        if user.status != AccountStatus::Locked {
            return Err(ErrorCode::AccountNotLocked.error());
        }

        self.verification_service.issue(&user.email, VerificationType::UnlockAccount).await
    }

    pub async fn confirm_unlock(&self, email: &str, code: &str) -> AppResult<UserResponse> {
        let mut user = self.find_by_email(email).await?;
        if user.status != AccountStatus::Locked {
            return Err(ErrorCode::AccountNotLocked.error());
        }

        self.verification_service
            .confirm(&user.email, VerificationType::UnlockAccount, code)
            .await?;

        user.unlock()?;
        self.user_repo.save(&user).await?;

        log::info!("계정 잠금 해제: {}", user.email);
        Ok(UserResponse::from(&user))
    }

    pub async fn request_reactivation(&self, email: &str) -> AppResult<()> {
        let user = self.find_by_email(email).await?;
        if user.status != AccountStatus::Dormant {
            return Err(ErrorCode::AccountNotDormant.error());
        }

        self.verification_service
            .issue(&user.email, VerificationType::DormantReactivation)
            .await
    }

    pub async fn confirm_reactivation(&self, email: &str, code: &str) -> AppResult<UserResponse> {
        let mut user = self.find_by_email(email).await?;
        if user.status != AccountStatus::Dormant {
            return Err(ErrorCode::AccountNotDormant.error());
        }

        self.verification_service
            .confirm(&user.email, VerificationType::DormantReactivation, code)
            .await?;

        user.reactivate(DateTime::now())?;
        self.user_repo.save(&user).await?;

        log::info!("휴면 계정 재활성화: {}", user.email);
        Ok(UserResponse::from(&user))
    }

    /// 비밀번호 재설정 코드 요청
    ///
    /// 가입 여부를 노출하지 않도록 없는 이메일이나 소셜 계정도 성공으로 응답합니다.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        match self.user_repo.find_by_email(&email).await? {
            Some(user) if user.can_authenticate_with_password() => {
                self.verification_service
                    .issue(&user.email, VerificationType::PasswordReset)
                    .await
            }
            _ => {
                log::info!("비밀번호 재설정 요청 무시 (대상 아님): {}", email);
                Ok(())
            }
        }
    }

    /// 비밀번호 재설정 확인. 기존 세션의 리프레시 토큰은 모두 폐기됩니다.
    pub async fn confirm_password_reset(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        let mut user = self.find_by_email(email).await?;
        if !user.can_authenticate_with_password() {
            return Err(ErrorCode::InvalidAccountStatus.error());
        }

        self.verification_service
            .confirm(&user.email, VerificationType::PasswordReset, code)
            .await?;

        user.change_password(hash_password(new_password)?);
        self.user_repo.save(&user).await?;

        if let Some(user_id) = user.id_string() {
            self.token_service.revoke_all_refresh(&user_id).await?;
        }

        log::info!("비밀번호 재설정 완료: {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(status: AccountStatus) -> User {
        let mut user = User::new_email("player@example.com".into(), "hash".into());
        user.status = status;
        user
    }

    #[test]
    fn test_login_status_gate() {
        assert!(check_login_status(&user_with(AccountStatus::Active)).is_ok());
        assert!(check_login_status(&user_with(AccountStatus::PendingNickname)).is_ok());

        let cases = [
            (AccountStatus::PendingEmail, ErrorCode::EmailNotVerified),
            (AccountStatus::Locked, ErrorCode::AccountLocked),
            (AccountStatus::Dormant, ErrorCode::AccountDormant),
        ];
        for (status, expected) in cases {
            assert_eq!(check_login_status(&user_with(status)).unwrap_err().code(), expected);
        }
    }

    #[test]
    fn test_fifth_failed_login_answers_locked_and_locks_user() {
        let mut user = user_with(AccountStatus::Active);
        let now = DateTime::now();

        for attempt in 1..5 {
            let err = record_failed_login(&mut user, now);
            assert_eq!(err.code(), ErrorCode::InvalidCredentials);
            assert_eq!(user.login_fail_count, attempt);
            assert_eq!(user.status, AccountStatus::Active);
        }

        let err = record_failed_login(&mut user, now);
        assert_eq!(err.code(), ErrorCode::AccountLocked);
        assert_eq!(user.status, AccountStatus::Locked);
        assert_eq!(user.locked_at, Some(now));

        // 잠긴 뒤에는 횟수가 늘지 않습니다
        let err = record_failed_login(&mut user, now);
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(user.login_fail_count, 5);
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = bcrypt::hash("secret123", 4).unwrap();
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }
}
