//! 고정 윈도우 요청 제한
//!
//! (클라이언트 IP, 엔드포인트 분류)마다 윈도우를 하나씩 둡니다. 윈도우가 끝난 뒤 첫 요청이
//! 새 윈도우를 시작합니다. 한도를 넘은 요청은 다음 서비스로 전달되지 않고 429로 끝납니다.
//!
//! 클라이언트는 연결 주소로 구분합니다. `RATE_LIMIT_TRUST_PROXY_HEADERS=true`일 때만
//! `X-Forwarded-For` 같은 프록시 헤더를 믿습니다.
//!
//! | 분류 | 대상 | 기본 한도 |
//! |------|------|-----------|
//! | `Auth` | 로그인, 회원가입, 가입 인증 | 윈도우당 5회 |
//! | `Default` | 그 밖의 모든 요청 | 윈도우당 100회 |

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use crate::config::RateLimitConfig;
use crate::core::errors::AppError;
use crate::utils::request::client_ip;

const AUTH_PATH_SUFFIXES: [&str; 4] = [
    "/auth/login",
    "/auth/register",
    "/auth/verify-email",
    "/auth/resend-verification",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    Auth,
    Default,
}

impl EndpointClass {
    pub fn of(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if AUTH_PATH_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)) {
            EndpointClass::Auth
        } else {
            EndpointClass::Default
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub window: Duration,
    pub auth_max_requests: u32,
    pub default_max_requests: u32,
    pub trust_proxy_headers: bool,
}

impl RateLimitSettings {
    pub fn from_config() -> Self {
        Self {
            window: Duration::from_secs(RateLimitConfig::window_seconds()),
            auth_max_requests: RateLimitConfig::auth_max_requests(),
            default_max_requests: RateLimitConfig::default_max_requests(),
            trust_proxy_headers: RateLimitConfig::trust_proxy_headers(),
        }
    }

    fn max_requests(&self, class: EndpointClass) -> u32 {
        match class {
            EndpointClass::Auth => self.auth_max_requests,
            EndpointClass::Default => self.default_max_requests,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

type WindowKey = (String, EndpointClass);

/// poison된 잠금도 그대로 이어서 씁니다.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct FixedWindowRateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<HashMap<WindowKey, Arc<Mutex<Window>>>>,
}

impl FixedWindowRateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn window_for(&self, key: WindowKey, now: Instant) -> Arc<Mutex<Window>> {
        lock(&self.windows)
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(Window { started_at: now, count: 0 })))
            .clone()
    }

    /// 요청 하나를 세고 허용 여부를 돌려줍니다.
    pub fn check_at(&self, client: &str, class: EndpointClass, now: Instant) -> Decision {
        let max = self.settings.max_requests(class);
        let entry = self.window_for((client.to_string(), class), now);
        let mut window = lock(&*entry);

        let elapsed = now.saturating_duration_since(window.started_at);
        if elapsed >= self.settings.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= max {
            let remaining = self.settings.window.saturating_sub(now.saturating_duration_since(window.started_at));
            let retry_after_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            return Decision::Limited { retry_after_secs: retry_after_secs.max(1) };
        }

        window.count += 1;
        Decision::Allowed { remaining: max - window.count }
    }

    /// 윈도우 키로 쓸 클라이언트 식별자
    pub fn client_key(&self, req: &HttpRequest) -> String {
        client_ip(req, self.settings.trust_proxy_headers)
    }

    pub fn check(&self, client: &str, class: EndpointClass) -> Decision {
        self.check_at(client, class, Instant::now())
    }

    /// 끝난 윈도우를 지우고 지운 개수를 돌려줍니다.
    pub fn prune_at(&self, now: Instant) -> usize {
        let window_length = self.settings.window;
        let mut windows = lock(&self.windows);
        let before = windows.len();

        windows.retain(|_, window| {
            now.saturating_duration_since(lock(&**window).started_at) < window_length
        });
        before - windows.len()
    }

    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    pub fn tracked_keys(&self) -> usize {
        lock(&self.windows).len()
    }
}

/// 요청 제한 미들웨어
pub struct RateLimit {
    limiter: Arc<FixedWindowRateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<FixedWindowRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    limiter: Arc<FixedWindowRateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
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
        let client = self.limiter.client_key(req.request());
        let class = EndpointClass::of(req.path());
        let decision = self.limiter.check(&client, class);
        let service = self.service.clone();

        Box::pin(async move {
            if let Decision::Limited { retry_after_secs } = decision {
                log::warn!("요청 제한 초과: ip={} path={} class={:?}", client, req.path(), class);
                let response = AppError::TooManyRequests { retry_after_secs }.to_response(req.path());
                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, http::StatusCode, test as actix_test, web, App, HttpResponse};
    use crate::core::errors::ErrorBody;

    fn settings() -> RateLimitSettings {
        RateLimitSettings {
            window: Duration::from_secs(60),
            auth_max_requests: 5,
            default_max_requests: 100,
            trust_proxy_headers: false,
        }
    }

    #[test]
    fn test_endpoint_classification() {
        assert_eq!(EndpointClass::of("/api/v1/auth/login"), EndpointClass::Auth);
        assert_eq!(EndpointClass::of("/api/v1/auth/register/"), EndpointClass::Auth);
        assert_eq!(EndpointClass::of("/api/v1/auth/verify-email"), EndpointClass::Auth);
        assert_eq!(EndpointClass::of("/api/v1/auth/refresh"), EndpointClass::Default);
        assert_eq!(EndpointClass::of("/api/v1/teams"), EndpointClass::Default);
    }

    #[test]
    fn test_sixth_login_in_window_is_limited() {
        let limiter = FixedWindowRateLimiter::new(settings());
        let start = Instant::now();

        for i in 0..5 {
            assert_eq!(
                limiter.check_at("203.0.113.7", EndpointClass::Auth, start + Duration::from_secs(i)),
                Decision::Allowed { remaining: 4 - i as u32 }
            );
        }

        assert_eq!(
            limiter.check_at("203.0.113.7", EndpointClass::Auth, start + Duration::from_secs(10)),
            Decision::Limited { retry_after_secs: 50 }
        );
    }

    #[test]
    fn test_window_resets_after_boundary() {
        let limiter = FixedWindowRateLimiter::new(settings());
        let start = Instant::now();

        for _ in 0..5 {
            limiter.check_at("203.0.113.7", EndpointClass::Auth, start);
        }
        assert!(matches!(
            limiter.check_at("203.0.113.7", EndpointClass::Auth, start + Duration::from_secs(59)),
            Decision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at("203.0.113.7", EndpointClass::Auth, start + Duration::from_secs(60)),
            Decision::Allowed { remaining: 4 }
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = FixedWindowRateLimiter::new(settings());
        let now = Instant::now();

        for _ in 0..5 {
            limiter.check_at("203.0.113.7", EndpointClass::Auth, now);
        }
        assert!(matches!(
            limiter.check_at("198.51.100.4", EndpointClass::Auth, now),
            Decision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("203.0.113.7", EndpointClass::Default, now),
            Decision::Allowed { .. }
        ));
    }

    #[test]
    fn test_prune_drops_finished_windows() {
        let limiter = FixedWindowRateLimiter::new(settings());
        let start = Instant::now();

        limiter.check_at("a", EndpointClass::Auth, start);
        limiter.check_at("b", EndpointClass::Default, start + Duration::from_secs(30));
        assert_eq!(limiter.tracked_keys(), 2);

        assert_eq!(limiter.prune_at(start + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    fn login_app_limiter(trust_proxy_headers: bool) -> Arc<FixedWindowRateLimiter> {
        Arc::new(FixedWindowRateLimiter::new(RateLimitSettings {
            trust_proxy_headers,
            ..settings()
        }))
    }

    fn login_from(peer: &str, forwarded_for: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(peer.parse().unwrap())
            .insert_header(("X-Forwarded-For", forwarded_for))
    }

    #[actix_web::test]
    async fn test_middleware_returns_429_without_calling_handler() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(login_app_limiter(false)))
                .route("/api/v1/auth/login", web::post().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        for _ in 0..5 {
            let req = actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .peer_addr("203.0.113.7:50000".parse().unwrap())
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("203.0.113.7:50001".parse().unwrap())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().contains_key(header::RETRY_AFTER));

        let body: ErrorBody = actix_test::read_body_json(res).await;
        assert_eq!(body.code, "RATE_LIMIT_EXCEEDED");
        assert_eq!(body.path, "/api/v1/auth/login");
    }

    #[actix_web::test]
    async fn test_rotating_forwarded_for_shares_peer_window() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(login_app_limiter(false)))
                .route("/api/v1/auth/login", web::post().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let mut allowed = 0;
        for i in 0..50 {
            let req = login_from("192.0.2.50:40000", &format!("10.1.{}.{}", i / 256, i % 256)).to_request();
            if actix_test::call_service(&app, req).await.status() == StatusCode::OK {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }

    #[actix_web::test]
    async fn test_forwarded_for_keys_clients_behind_trusted_proxy() {
        let limiter = login_app_limiter(true);

        let proxied = login_from("10.0.0.1:8000", "203.0.113.7").to_http_request();
        assert_eq!(limiter.client_key(&proxied), "203.0.113.7");

        let direct = login_from("192.0.2.50:40000", "203.0.113.7").to_http_request();
        assert_eq!(login_app_limiter(false).client_key(&direct), "192.0.2.50");
    }
}
