//! # Core Framework Module
//!
//! 모든 계층이 기대는 두 가지 기반을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입별 싱글톤 보관소
//! - **자동 레지스트리**: `#[service]` / `#[repository]`가 `inventory`로 등록
//! - **의존성 해결**: `Arc<T>` 필드는 초기화 시점에 자동 주입
//! - **순환 참조 감지**: 초기화 중인 타입을 다시 요청하면 즉시 실패
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 도메인 에러 분류 + 인프라 에러
//! - **ErrorCode**: 클라이언트가 분기하는 기계 판독용 코드
//! - **응답 봉투**: `{status, error, code, message, path, details}`
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! #[repository(name = "team", collection = "teams")]
//! pub struct TeamRepository {
//!     db: Arc<Database>,
//! }
//!
//! #[service(name = "team")]
//! pub struct TeamService {
//!     team_repo: Arc<TeamRepository>,   // 자동 주입
//!     redis: Arc<RedisClient>,          // main에서 ServiceLocator::set으로 등록
//! }
//!
//! let team = TeamService::instance().find_team(&team_id).await?;
//! ```
//!
//! ### 애플리케이션 초기화 순서
//!
//! 1. `Database`, `RedisClient`를 만들어 `ServiceLocator::set()`
//! 2. `ServiceLocator::initialize_all()`로 리포지토리, 서비스 순서로 생성
//! 3. 인덱스 생성, 스케줄러 시작, HTTP 서버 시작
//!
//! ### 에러 처리
//!
//! ```rust,ignore
//! // 서비스: 도메인 코드로 에러 생성
//! if member.role == TeamRole::Owner {
//!     return Err(ErrorCode::OwnerCannotLeave.error());
//! }
//!
//! // 핸들러: `?`로 전파하면 ResponseError가 봉투로 직렬화
//! let response = TeamService::instance().leave(&team_id, &user.user_id).await?;
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 참조 감지
//! ```text
//! ❌ Circular dependency detected for type: TeamService
//! ```
//! 서비스가 서로를 필드로 주입하지 않도록 한쪽을 리포지토리 의존으로 바꿉니다.
//!
//! ### 미등록 타입
//! ```text
//! panic: Service not found: RedisClient
//! ```
//! `initialize_all()` 전에 `ServiceLocator::set()`을 호출했는지 확인합니다.

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
