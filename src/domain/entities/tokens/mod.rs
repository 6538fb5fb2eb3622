//! 토큰 저장 엔티티
//!
//! - [`refresh_token::RefreshToken`] - 회전되는 리프레시 토큰
//! - [`token_blacklist::TokenBlacklist`] - 로그아웃 등으로 폐기된 액세스 토큰

pub mod refresh_token;
pub mod token_blacklist;

pub use refresh_token::RefreshToken;
pub use token_blacklist::{BlacklistReason, TokenBlacklist};
