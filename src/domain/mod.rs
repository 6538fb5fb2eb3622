//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 모듈입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB에 저장되는 핵심 객체와 상태 전이 규칙
//! ├── dto       - API 요청/응답 계약 (validator 검증 포함)
//! └── models    - 인증 컨텍스트, JWT 클레임, 외부 OAuth 응답 모델
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB, Redis)
//! ```

pub mod entities;
pub mod dto;
pub mod models;
