//! JWT 인증 미들웨어
//!
//! `Authorization: Bearer <token>` 헤더를 검증하고 성공하면 [`AuthenticatedUser`]를
//! Request Extensions에 넣습니다. 핸들러는 `AuthenticatedUser`를 인자로 받아 꺼냅니다.
//! 토큰이 없거나 무효하면 핸들러를 호출하지 않고 401 에러 봉투로 응답합니다.
//!
//! [`AuthenticatedUser`]: crate::domain::models::auth::AuthenticatedUser

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// 유효한 액세스 토큰이 있어야 통과
    pub fn required() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use crate::core::errors::ErrorBody;

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_required_mode_rejects_missing_token_with_envelope() {
        let app = test::init_service(
            App::new().service(
                web::scope("/teams")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/teams").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.code, "AUTHENTICATION_REQUIRED");
        assert_eq!(body.path, "/teams");
    }

    #[actix_web::test]
    async fn test_malformed_bearer_header_is_rejected() {
        let app = test::init_service(
            App::new().service(
                web::scope("/teams")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/teams")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
