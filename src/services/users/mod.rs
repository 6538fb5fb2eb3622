//! 사용자 관리 서비스 모듈
//!
//! 프로필 조회, 닉네임 설정/변경, 비밀번호 변경, 회원 탈퇴, 휴면 전환을 담당합니다.
//! 가입과 로그인은 [`crate::services::auth::AuthService`]에 있습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user_service = UserService::instance();
//! let me = user_service.set_initial_nickname(&auth_user.user_id, "faker").await?;
//! ```

pub mod user_service;

pub use user_service::UserService;
