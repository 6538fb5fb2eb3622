use std::sync::Arc;

use mongodb::bson::DateTime;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::core::errors::AppResult;
use crate::middlewares::FixedWindowRateLimiter;
use crate::services::auth::{TokenService, VerificationService};
use crate::services::teams::InvitationService;
use crate::services::users::UserService;

/// 매시 정각: 블랙리스트, 리프레시 토큰, 인증 코드 정리
const TOKEN_CLEANUP_SCHEDULE: &str = "0 0 * * * *";
/// 10분마다: 기한이 지난 초대를 EXPIRED로
const INVITATION_EXPIRY_SCHEDULE: &str = "0 */10 * * * *";
/// 매일 04:00 (UTC): 휴면 계정 전환
const DORMANCY_SCHEDULE: &str = "0 0 4 * * *";
/// 매분: 끝난 요청 제한 윈도우 제거
const RATE_LIMIT_PRUNE_SCHEDULE: &str = "30 * * * * *";

/// 유지보수 스케줄러를 시작합니다
///
/// 서비스 싱글톤이 모두 초기화된 뒤에 호출해야 합니다.
///
/// # Arguments
/// - `limiter`: HTTP 서버와 공유하는 요청 제한기
pub async fn start_scheduler(limiter: Arc<FixedWindowRateLimiter>) -> AppResult<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let token_cleanup = Job::new_async(TOKEN_CLEANUP_SCHEDULE, |_uuid, _lock| {
        Box::pin(async move {
            if let Err(e) = purge_expired_tokens(DateTime::now()).await {
                log::error!("만료 토큰 정리 실패: {}", e);
            }
        })
    })?;

    let invitation_expiry = Job::new_async(INVITATION_EXPIRY_SCHEDULE, |_uuid, _lock| {
        Box::pin(async move {
            match InvitationService::instance().expire_overdue(DateTime::now()).await {
                Ok(0) => {}
                Ok(count) => log::info!("기한이 지난 초대 {}건을 만료 처리했습니다", count),
                Err(e) => log::error!("초대 만료 처리 실패: {}", e),
            }
        })
    })?;

    let dormancy = Job::new_async(DORMANCY_SCHEDULE, |_uuid, _lock| {
        Box::pin(async move {
            match UserService::instance().mark_dormant_users(DateTime::now()).await {
                Ok(count) => log::info!("휴면 전환: {}명", count),
                Err(e) => log::error!("휴면 계정 처리 실패: {}", e),
            }
        })
    })?;

    let rate_limit_prune = Job::new_async(RATE_LIMIT_PRUNE_SCHEDULE, move |_uuid, _lock| {
        let limiter = limiter.clone();
        Box::pin(async move {
            let removed = limiter.prune();
            if removed > 0 {
                log::debug!("요청 제한 윈도우 {}개 정리 (남은 키 {}개)", removed, limiter.tracked_keys());
            }
        })
    })?;

    scheduler.add(token_cleanup).await?;
    scheduler.add(invitation_expiry).await?;
    scheduler.add(dormancy).await?;
    scheduler.add(rate_limit_prune).await?;
    scheduler.start().await?;

    log::info!("유지보수 스케줄러 시작");
    Ok(scheduler)
}

async fn purge_expired_tokens(now: DateTime) -> AppResult<()> {
    let (blacklisted, refresh) = TokenService::instance().purge_expired(now).await?;
    let codes = VerificationService::instance().purge_expired(now).await?;

    log::info!(
        "만료 데이터 정리: 블랙리스트 {}건, 리프레시 토큰 {}건, 인증 코드 {}건",
        blacklisted, refresh, codes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_schedules_are_valid_cron_expressions() {
        for expr in [
            TOKEN_CLEANUP_SCHEDULE,
            INVITATION_EXPIRY_SCHEDULE,
            DORMANCY_SCHEDULE,
            RATE_LIMIT_PRUNE_SCHEDULE,
        ] {
            let job = Job::new_async(expr, |_uuid, _lock| Box::pin(async {}));
            assert!(job.is_ok(), "{}", expr);
        }
    }
}
