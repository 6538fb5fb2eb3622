//! 팀 매니저 백엔드 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! MongoDB, Redis 연결을 설정하고 인덱스를 만든 뒤 유지보수 스케줄러와 REST API를 시작합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use team_manager_backend::caching::redis::RedisClient;
use team_manager_backend::config::{CorsConfig, ServerConfig};
use team_manager_backend::core::registry::ServiceLocator;
use team_manager_backend::db::Database;
use team_manager_backend::middlewares::{ErrorEnvelope, FixedWindowRateLimiter, RateLimit, RateLimitSettings};
use team_manager_backend::repositories::ensure_indexes;
use team_manager_backend::routes::{configure_all_routes, not_found};
use team_manager_backend::scheduler;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 팀 매니저 백엔드 시작중...");

    // 데이터 스토어 초기화
    let (database, redis_client) = initialize_data_stores().await?;

    // ServiceLocator에 핵심 서비스 등록
    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    // 모든 서비스 초기화
    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    ensure_indexes()
        .await
        .map_err(|e| io::Error::other(format!("인덱스 생성 실패: {}", e)))?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let settings = RateLimitSettings::from_config();
    info!(
        "🛡️ Rate Limiting 활성화: {}초 윈도우, 인증 {}회, 기본 {}회",
        settings.window.as_secs(),
        settings.auth_max_requests,
        settings.default_max_requests
    );
    let limiter = Arc::new(FixedWindowRateLimiter::new(settings));

    // 스케줄러가 멈춰도 API는 계속 제공
    let _scheduler = match scheduler::start_scheduler(limiter.clone()).await {
        Ok(scheduler) => Some(scheduler),
        Err(e) => {
            error!("유지보수 스케줄러 시작 실패: {}", e);
            None
        }
    };

    // HTTP 서버 시작
    start_http_server(limiter).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어는 바깥쪽부터 Logger → CORS → 경로 정규화 → 요청 제한 → 에러 봉투 순서로 적용됩니다.
///
/// ```rust,ignore
/// // Health check: http://0.0.0.0:8080/health
/// // API 엔드포인트: http://0.0.0.0:8080/api/v1/*
/// ```
async fn start_http_server(limiter: Arc<FixedWindowRateLimiter>) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();
    let workers = ServerConfig::workers();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API: http://{}/api/v1", bind_address);

    let allowed_origins = CorsConfig::allowed_origins();
    info!("CORS 허용 Origin: {:?}", allowed_origins);

    HttpServer::new(move || {
        App::new()
            .wrap(ErrorEnvelope)
            .wrap(RateLimit::new(limiter.clone()))
            .wrap(middleware::NormalizePath::trim())
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .configure(configure_all_routes)
            .default_service(web::to(not_found))
    })
        .bind(&bind_address)?
        .workers(workers)
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG`가 없으면 `info,actix_web=info`
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// CORS 설정을 구성합니다
///
/// 허용 Origin은 `CORS_ALLOWED_ORIGINS` (쉼표 구분)에서 읽습니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .supports_credentials()
        .max_age(3600)
}
