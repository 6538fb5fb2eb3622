//! 인증 및 보안 서비스 모듈
//!
//! # Features
//!
//! - 이메일 회원가입, 로그인, 계정 잠금/휴면 해제, 비밀번호 재설정
//! - JWT 액세스/리프레시 토큰 발급, 회전, 블랙리스트
//! - 이메일 인증 코드
//! - 카카오 OAuth 2.0 소셜 로그인
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthService, TokenService};
//!
//! let tokens = AuthService::instance().login("player@example.com", "secret123").await?;
//! let user = TokenService::instance().authenticate(&tokens.tokens.access_token).await?;
//! ```

pub mod token_service;
pub mod verification_service;
pub mod auth_service;
pub mod oauth_service;

pub use token_service::{hash_token, JwtCodec, RevokedTokenLookup, TokenError, TokenService};
pub use verification_service::VerificationService;
pub use auth_service::AuthService;
pub use oauth_service::OAuthService;
