//! # Data Transfer Objects
//!
//! API 경계의 요청/응답 구조체입니다. 요청 DTO는 `validator`로 형식을 검증하고,
//! 응답 DTO는 엔티티에서 `From`으로 변환합니다. 시각은 RFC 3339 문자열로 내려갑니다.
//!
//! ```text
//! dto/
//! ├── common.rs     ← 공통 응답
//! ├── auth/         ← 가입, 로그인, 토큰, 인증 코드, OAuth
//! ├── users/        ← 프로필, 닉네임, 비밀번호
//! ├── teams/        ← 팀, 멤버, 초대
//! ├── scrims/       ← 스크림, 라운드 결과, 순위표
//! └── strategies/   ← 전략 보드
//! ```

pub mod common;
pub mod auth;
pub mod users;
pub mod teams;
pub mod scrims;
pub mod strategies;

pub use common::MessageResponse;
