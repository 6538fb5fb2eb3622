//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청 DTO를 검증하고 싱글톤 서비스에 위임한 뒤 응답 DTO를 JSON으로 돌려줍니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 작성 규칙
//!
//! ```rust,ignore
//! #[post("")]
//! pub async fn create_team(
//!     user: AuthenticatedUser,                 // AuthMiddleware가 넣어 둔 사용자
//!     payload: web::Json<CreateTeamRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()?;                     // 필드별 details가 담긴 400
//!     let response = TeamService::instance()
//!         .create(&user.user_id, payload.into_inner())
//!         .await?;
//!     Ok(HttpResponse::Created().json(response))
//! }
//! ```
//!
//! 핸들러가 돌려준 `AppError`는 `ErrorEnvelope` 미들웨어를 거쳐 요청 경로가 담긴
//! 에러 봉투로 직렬화됩니다.
//!
//! ## 모듈 구성
//! - **`auth`**: 가입, 로그인, 토큰 갱신, 로그아웃, 계정 복구, 카카오 OAuth
//! - **`users`**: 내 정보, 닉네임, 비밀번호, 탈퇴, 공개 프로필
//! - **`teams`**: 팀, 멤버, 팀 초대 발송
//! - **`invitations`**: 초대 조회/수락/거절/취소
//! - **`scrims`**: 스크림 일정, 라운드 결과, 순위표
//! - **`strategies`**: 전략 보드
//! - **`health`**: 헬스체크

pub mod auth;
pub mod users;
pub mod teams;
pub mod invitations;
pub mod scrims;
pub mod strategies;
pub mod health;
