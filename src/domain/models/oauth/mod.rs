//! # OAuth Domain Models Module
//!
//! 외부 OAuth 프로바이더 응답 모델입니다. 현재는 카카오만 지원합니다.
//!
//! ```text
//! oauth/
//! └── kakao_oauth_model/
//!     └── kakao_user.rs   ← 토큰 응답, 사용자 정보, state
//! ```

pub mod kakao_oauth_model;

pub use kakao_oauth_model::*;
