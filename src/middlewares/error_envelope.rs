//! 에러 응답 봉투의 `path` 채우기
//!
//! 핸들러와 추출기가 돌려준 [`AppError`]는 `ResponseError::error_response`에서 경로 없이
//! 직렬화됩니다. 이 미들웨어는 응답에 붙은 원본 에러를 꺼내 요청 경로를 넣어 다시 만듭니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::AppError;

pub struct ErrorEnvelope;

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorEnvelopeService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeService {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorEnvelopeService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let res = service.call(req).await?;

            let rebuilt = res
                .response()
                .error()
                .and_then(|e| e.as_error::<AppError>())
                .map(|app_error| app_error.to_response(res.request().path()));

            match rebuilt {
                Some(response) => Ok(res.into_response(response).map_into_right_body()),
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use crate::core::errors::{ErrorBody, ErrorCode};

    async fn missing_team() -> Result<HttpResponse, AppError> {
        Err(ErrorCode::TeamNotFound.error())
    }

    #[actix_web::test]
    async fn test_handler_error_gets_request_path() {
        let app = test::init_service(
            App::new()
                .wrap(ErrorEnvelope)
                .route("/api/v1/teams/{id}", web::get().to(missing_team)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/teams/abc").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.code, "TEAM_NOT_FOUND");
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.path, "/api/v1/teams/abc");
    }

    #[actix_web::test]
    async fn test_success_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(ErrorEnvelope)
                .route("/health", web::get().to(|| async { HttpResponse::Ok().body("ok") })),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "ok");
    }
}
