//! 환경 변수 기반 설정
//!
//! 각 설정은 상태 없는 구조체의 연관 함수로 제공됩니다 (`JwtConfig::secret()` 등).

pub mod data_config;
pub mod auth_config;
pub mod mail_config;

pub use data_config::*;
pub use auth_config::*;
pub use mail_config::*;
