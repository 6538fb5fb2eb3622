//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로를 사용하여 싱글톤으로 관리되는 리포지토리들을 제공합니다.
//! MongoDB를 주 저장소로 사용하고, 사용자 조회와 토큰 블랙리스트는 Redis 캐시를 함께 씁니다.
//!
//! ```rust,ignore
//! use crate::repositories::teams::TeamRepository;
//!
//! let team_repo = TeamRepository::instance();
//! let team = team_repo.find_by_id(&team_id).await?;
//! ```

pub mod users;
pub mod tokens;
pub mod verifications;
pub mod teams;
pub mod scrims;
pub mod strategies;

use crate::core::errors::AppResult;

/// 부팅 시 모든 컬렉션의 인덱스를 보장합니다.
pub async fn ensure_indexes() -> AppResult<()> {
    users::UserRepository::instance().create_indexes().await?;
    tokens::TokenRepository::instance().create_indexes().await?;
    tokens::BlacklistRepository::instance().create_indexes().await?;
    verifications::VerificationRepository::instance().create_indexes().await?;
    teams::TeamRepository::instance().create_indexes().await?;
    teams::MemberRepository::instance().create_indexes().await?;
    teams::InvitationRepository::instance().create_indexes().await?;
    scrims::ScrimRepository::instance().create_indexes().await?;
    strategies::StrategyRepository::instance().create_indexes().await?;

    log::info!("✅ MongoDB 인덱스 확인 완료");
    Ok(())
}
