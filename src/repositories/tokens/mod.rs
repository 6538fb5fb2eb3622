//! 토큰 저장소
//!
//! - [`TokenRepository`]: 리프레시 토큰 (`refresh_tokens`)
//! - [`BlacklistRepository`]: 로그아웃 등으로 폐기된 액세스 토큰 (`token_blacklist` + Redis)

pub mod token_repository;
pub mod blacklist_repository;

pub use token_repository::TokenRepository;
pub use blacklist_repository::BlacklistRepository;
