//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 매핑되는 도메인 엔티티입니다.
//! 상태 전이 규칙(계정, 초대, 스크림 등)은 엔티티 메서드 안에 두고,
//! 서비스 계층은 조회 → 전이 → 저장만 담당합니다.
//!
//! ```text
//! entities/
//! ├── users/          ← 사용자, 계정 상태 머신
//! ├── tokens/         ← 리프레시 토큰, 액세스 토큰 블랙리스트
//! ├── verifications/  ← 이메일 인증 코드
//! ├── teams/          ← 팀, 멤버, 초대
//! ├── scrims/         ← 스크림, 라운드 결과, 순위표
//! └── strategies/     ← 전략 보드
//! ```
//!
//! 시간에 의존하는 메서드는 모두 `now`를 인자로 받습니다.

pub mod users;
pub mod tokens;
pub mod verifications;
pub mod teams;
pub mod scrims;
pub mod strategies;

pub use users::*;
pub use tokens::*;
pub use verifications::*;
pub use teams::*;
pub use scrims::*;
pub use strategies::*;
