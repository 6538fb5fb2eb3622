//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//! 리포지토리와 다른 서비스는 `Arc` 필드로 자동 주입됩니다.
//!
//! # Features
//!
//! - 계정 생명주기 (가입, 이메일 인증, 잠금, 휴면, 탈퇴)
//! - JWT 토큰 발급/회전/폐기, 카카오 OAuth 로그인
//! - 팀, 멤버, 초대 관리
//! - 스크림 일정과 라운드 결과, 팀 전략 보드
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{teams::TeamService, auth::TokenService};
//!
//! let team_service = TeamService::instance();
//! let token_service = TokenService::instance();
//! ```

pub mod auth;
pub mod mail;
pub mod users;
pub mod teams;
pub mod scrims;
pub mod strategies;
