use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    core::errors::{AppResult, ErrorCode},
    domain::dto::users::{PublicUserResponse, UserResponse},
    domain::entities::tokens::BlacklistReason,
    domain::entities::users::{user::DORMANT_AFTER_DAYS, User},
    domain::models::auth::AuthenticatedUser,
    repositories::users::UserRepository,
    services::auth::{
        auth_service::{hash_password, verify_password},
        TokenService,
    },
    services::teams::TeamService,
    utils::time::plus_days,
};

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,

    token_service: Arc<TokenService>,

    team_service: Arc<TeamService>,
}

impl UserService {
    async fn find_user(&self, user_id: &str) -> AppResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ErrorCode::UserNotFound.error())
    }

    /// 다른 사용자가 이미 쓰는 닉네임인지 확인
    async fn ensure_nickname_available(&self, user: &User, nickname: &str) -> AppResult<()> {
        if let Some(owner) = self.user_repo.find_by_nickname(nickname).await? {
            if owner.id != user.id {
                return Err(ErrorCode::NicknameAlreadyExists.error());
            }
        }
        Ok(())
    }

    pub async fn get_me(&self, user_id: &str) -> AppResult<UserResponse> {
        Ok(UserResponse::from(&self.find_user(user_id).await?))
    }

    pub async fn get_public(&self, user_id: &str) -> AppResult<PublicUserResponse> {
        Ok(PublicUserResponse::from(&self.find_user(user_id).await?))
    }

    /// 최초 닉네임 설정 (PENDING_NICKNAME → ACTIVE)
    pub async fn set_initial_nickname(&self, user_id: &str, nickname: &str) -> AppResult<UserResponse> {
        let mut user = self.find_user(user_id).await?;
        let nickname = nickname.trim().to_string();

        self.ensure_nickname_available(&user, &nickname).await?;
        user.set_initial_nickname(nickname)?;
        self.user_repo.save(&user).await?;

        log::info!("닉네임 설정, 계정 활성화: user_id={}", user_id);
        Ok(UserResponse::from(&user))
    }

    /// 닉네임 변경 (30일에 한 번)
    pub async fn update_nickname(&self, user_id: &str, nickname: &str) -> AppResult<UserResponse> {
        let mut user = self.find_user(user_id).await?;
        let nickname = nickname.trim().to_string();

        self.ensure_nickname_available(&user, &nickname).await?;
        user.update_nickname(nickname, DateTime::now())?;
        self.user_repo.save(&user).await?;

        log::info!("닉네임 변경: user_id={}", user_id);
        Ok(UserResponse::from(&user))
    }

    /// 비밀번호 변경. 현재 세션을 포함한 모든 토큰이 무효화됩니다.
    pub async fn change_password(
        &self,
        auth_user: &AuthenticatedUser,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let mut user = self.find_user(&auth_user.user_id).await?;

        let password_hash = user.password_hash
            .clone()
            .filter(|_| user.can_authenticate_with_password())
            .ok_or_else(|| ErrorCode::InvalidAccountStatus.with_message("소셜 로그인 계정은 비밀번호가 없습니다"))?;

        if !verify_password(current_password, &password_hash)? {
            return Err(ErrorCode::InvalidCredentials.with_message("현재 비밀번호가 올바르지 않습니다"));
        }

        user.change_password(hash_password(new_password)?);
        self.user_repo.save(&user).await?;

        self.token_service.revoke_access(auth_user, BlacklistReason::PasswordChanged).await?;
        self.token_service.revoke_all_refresh(&auth_user.user_id).await?;

        log::info!("비밀번호 변경: user_id={}", auth_user.user_id);
        Ok(())
    }

    /// 회원 탈퇴
    ///
    /// 소유한 팀이 있으면 실패합니다. 팀 멤버십과 토큰을 정리한 뒤 계정을 삭제합니다.
    pub async fn withdraw(&self, auth_user: &AuthenticatedUser) -> AppResult<()> {
        let user = self.find_user(&auth_user.user_id).await?;

        let left = self.team_service.leave_all(&auth_user.user_id).await?;
        self.token_service.revoke_access(auth_user, BlacklistReason::AccountWithdrawn).await?;
        self.token_service.revoke_all_refresh(&auth_user.user_id).await?;
        self.user_repo.delete(&user).await?;

        log::info!("회원 탈퇴: user_id={} (팀 {}개 탈퇴)", auth_user.user_id, left);
        Ok(())
    }

    /// 180일 이상 미접속한 ACTIVE 계정을 휴면 처리합니다.
    pub async fn mark_dormant_users(&self, now: DateTime) -> AppResult<usize> {
        let candidates = self.user_repo
            .find_dormant_candidates(plus_days(now, -DORMANT_AFTER_DAYS))
            .await?;

        let mut count = 0;
        for mut user in candidates.into_iter().filter(|u| u.is_dormant_candidate(now)) {
            user.mark_as_dormant(now)?;
            self.user_repo.save(&user).await?;
            count += 1;
        }
        Ok(count)
    }
}
