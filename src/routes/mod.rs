//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트를 기능별 scope로 묶어 `/api/v1` 아래에 등록합니다.
//! 헬스체크만 루트(`/health`)에 있습니다.
//!
//! # Auth Middleware Usage
//!
//! ## 인증 불필요 (`/auth`)
//! 가입, 로그인, 토큰 갱신, 계정 복구, OAuth 콜백은 토큰 없이 호출합니다.
//! 로그아웃만 리소스 단위로 `AuthMiddleware::required()`를 감쌉니다.
//!
//! ## 인증 필요
//! ```rust,ignore
//! cfg.service(
//!     web::scope("/teams")
//!         .wrap(AuthMiddleware::required())
//!         .service(handlers::teams::create_team)
//! );
//! ```
//!
//! # Extractor 에러
//!
//! JSON 본문이나 쿼리 파싱 실패도 `AppError` 검증 에러(400, `INVALID_INPUT`)로 바꿉니다.

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::core::errors::{AppError, ErrorCode};
use crate::handlers;
use crate::middlewares::AuthMiddleware;

/// 모든 라우트를 설정합니다
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new()
///     .configure(configure_all_routes)
///     .default_service(web::to(not_found));
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config());

    // Health check endpoint
    cfg.service(handlers::health::health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_team_routes)
            .configure(configure_invitation_routes)
            .configure(configure_scrim_routes)
            .configure(configure_strategy_routes),
    );
}

/// 인증 관련 라우트
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"player@example.com","password":"secret123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::verify_email)
            .service(handlers::auth::resend_verification)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(
                web::resource("/logout")
                    .wrap(AuthMiddleware::required())
                    .route(web::post().to(handlers::auth::logout)),
            )
            .service(handlers::auth::request_unlock)
            .service(handlers::auth::confirm_unlock)
            .service(handlers::auth::request_reactivation)
            .service(handlers::auth::confirm_reactivation)
            .service(handlers::auth::request_password_reset)
            .service(handlers::auth::confirm_password_reset)
            // Kakao OAuth
            .service(handlers::auth::kakao_login_url)
            .service(handlers::auth::kakao_callback),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::set_initial_nickname)
            .service(handlers::users::update_nickname)
            .service(handlers::users::change_password)
            .service(handlers::users::withdraw)
            // `/me` 계열보다 뒤에 등록
            .service(handlers::users::get_user),
    );
}

fn configure_team_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .wrap(AuthMiddleware::required())
            .service(handlers::teams::create_team)
            .service(handlers::teams::list_my_teams)
            .service(handlers::teams::get_team)
            .service(handlers::teams::update_team)
            .service(handlers::teams::delete_team)
            .service(handlers::teams::list_members)
            .service(handlers::teams::change_member_role)
            .service(handlers::teams::remove_member)
            .service(handlers::teams::leave_team)
            .service(handlers::teams::transfer_ownership)
            .service(handlers::teams::invite_member)
            .service(handlers::teams::list_team_invitations),
    );
}

fn configure_invitation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invitations")
            .wrap(AuthMiddleware::required())
            .service(handlers::invitations::list_my_invitations)
            .service(handlers::invitations::get_invitation)
            .service(handlers::invitations::accept_invitation)
            .service(handlers::invitations::decline_invitation)
            .service(handlers::invitations::cancel_invitation),
    );
}

fn configure_scrim_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/scrims")
            .wrap(AuthMiddleware::required())
            .service(handlers::scrims::create_scrim)
            .service(handlers::scrims::list_team_scrims)
            .service(handlers::scrims::get_scrim)
            .service(handlers::scrims::update_scrim)
            .service(handlers::scrims::start_scrim)
            .service(handlers::scrims::complete_scrim)
            .service(handlers::scrims::cancel_scrim)
            .service(handlers::scrims::record_round)
            .service(handlers::scrims::get_standings),
    );
}

fn configure_strategy_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/strategies")
            .wrap(AuthMiddleware::required())
            .service(handlers::strategies::create_strategy)
            .service(handlers::strategies::list_team_strategies)
            .service(handlers::strategies::get_strategy)
            .service(handlers::strategies::update_strategy)
            .service(handlers::strategies::delete_strategy),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("JSON 본문 파싱 실패: {}", err);
        let field = match &err {
            error::JsonPayloadError::ContentType => "content-type",
            _ => "body",
        };
        AppError::invalid_field(field, err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::invalid_field("query", err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| ErrorCode::InvalidId.error().into())
}

/// 등록되지 않은 경로에 대한 기본 서비스
pub async fn not_found(_req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(ErrorCode::EndpointNotFound.error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use crate::core::errors::ErrorBody;
    use crate::middlewares::ErrorEnvelope;

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(ErrorEnvelope)
                    .configure(configure_all_routes)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_unknown_endpoint_returns_envelope() {
        let app = app!();

        let req = test::TestRequest::get().uri("/api/v1/nowhere").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.code, "ENDPOINT_NOT_FOUND");
        assert_eq!(body.path, "/api/v1/nowhere");
    }

    #[actix_web::test]
    async fn test_protected_scopes_require_token() {
        let app = app!();

        for uri in ["/api/v1/teams", "/api/v1/users/me", "/api/v1/invitations/me"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", uri);

            let body: ErrorBody = test::read_body_json(res).await;
            assert_eq!(body.code, "AUTHENTICATION_REQUIRED");
            assert_eq!(body.path, uri);
        }
    }

    #[actix_web::test]
    async fn test_logout_requires_token() {
        let app = app!();

        let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_validation_error() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.code, "INVALID_INPUT");
        assert_eq!(body.path, "/api/v1/auth/login");
        assert_eq!(body.details.map(|d| d[0].field.clone()), Some("body".to_string()));
    }

    #[actix_web::test]
    async fn test_invalid_login_payload_lists_fields() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({"email": "nope", "password": ""}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(res).await;
        let fields: Vec<String> = body.details.unwrap_or_default().into_iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["email".to_string(), "password".to_string()]);
    }
}
