//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델입니다.
//!
//! - `auth`: 요청 단위 인증 컨텍스트 (`AuthenticatedUser`)
//! - `token`: JWT 클레임과 토큰 쌍
//! - `oauth`: 외부 OAuth 프로바이더 응답

pub mod auth;
pub mod token;
pub mod oauth;
