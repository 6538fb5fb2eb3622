//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 횡단 관심사를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출, JWT 검증, 블랙리스트 확인
//! - 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드 지원
//!
//! ### 2. 요청 제한 (RateLimit)
//! - (IP, 엔드포인트 분류)별 고정 윈도우 카운터
//!
//! ### 3. 에러 봉투 (ErrorEnvelope)
//! - 에러 응답에 요청 경로 기록
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! App::new()
//!     .wrap(ErrorEnvelope)
//!     .wrap(RateLimit::new(limiter.clone()))
//!     .service(
//!         web::scope("/api/v1/teams")
//!             .wrap(AuthMiddleware::required())
//!             .service(create_team)
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;
pub mod rate_limit;
pub mod error_envelope;

pub use auth_middleware::AuthMiddleware;
pub use rate_limit::{FixedWindowRateLimiter, RateLimit, RateLimitSettings};
pub use error_envelope::ErrorEnvelope;
