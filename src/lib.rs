//! 팀 매니저 백엔드
//!
//! e스포츠 팀 운영을 위한 REST 백엔드입니다. 계정 수명주기, JWT 인증,
//! 팀/멤버/초대 관리, 스크림 일정과 결과, 전략 보드를 제공합니다.
//!
//! # Features
//!
//! - **계정**: 이메일 인증 가입, 닉네임 온보딩, 로그인 실패 잠금, 휴면 전환
//! - **JWT 인증**: 액세스/리프레시 토큰, 리프레시 회전, 로그아웃 블랙리스트
//! - **OAuth 2.0**: 카카오 소셜 로그인
//! - **팀**: 역할(OWNER/LEADER/MEMBER), 토큰 기반 초대
//! - **스크림**: 라운드별 순위 기록과 순위표
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//! - **MongoDB**: 영구 저장, **Redis**: TTL 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 (/api/v1)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Middlewares   │ ← 에러 봉투, 요청 제한, 인증
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직 (+ scheduler 주기 작업)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use team_manager_backend::services::teams::TeamService;
//!
//! // 싱글톤 서비스 인스턴스 가져오기
//! let team_service = TeamService::instance();
//! let teams = team_service.list_mine(&user_id).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
pub mod scheduler;
