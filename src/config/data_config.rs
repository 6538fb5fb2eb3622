//! 인프라 및 서버 설정
//!
//! 모든 값은 환경 변수에서 읽고, 없거나 파싱에 실패하면 기본값을 사용합니다.
//! 프로파일별 `.env.dev` / `.env.prod` 로딩은 `main.rs`에서 처리합니다.

use std::env;
use std::str::FromStr;

/// 환경 변수를 파싱하고 실패 시 기본값을 반환합니다.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        Self::from_str(
            &env::var("ENVIRONMENT")
                .or_else(|_| env::var("PROFILE"))
                .unwrap_or_else(|_| "production".to_string()),
        )
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// bcrypt cost 설정
///
/// `BCRYPT_COST`(4-15)가 있으면 우선하고, 없으면 환경별 기본값을 씁니다.
pub struct PasswordConfig;

impl PasswordConfig {
    pub fn bcrypt_cost() -> u32 {
        match env::var("BCRYPT_COST").ok().and_then(|v| v.parse::<u32>().ok()) {
            Some(cost) if (4..=15).contains(&cost) => cost,
            _ => Self::bcrypt_cost_for_env(&Environment::current()),
        }
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env_parse("PORT", 8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn workers() -> usize {
        env_parse("SERVER_WORKERS", 4)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// Redis 접속 정보
///
/// `REDIS_URL`이 있으면 그대로 쓰고, 없으면 `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASSWORD`로 조립합니다.
pub struct RedisConfig;

impl RedisConfig {
    pub fn url() -> String {
        if let Ok(url) = env::var("REDIS_URL") {
            return url;
        }

        let host = env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = env_parse("REDIS_PORT", 6379);
        match env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()) {
            Some(password) => format!("redis://:{}@{}:{}", urlencoding::encode(&password), host, port),
            None => format!("redis://{}:{}", host, port),
        }
    }
}

pub struct CorsConfig;

impl CorsConfig {
    pub fn allowed_origins() -> Vec<String> {
        Self::parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
        )
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 캐시 TTL (초)
pub struct CacheConfig;

impl CacheConfig {
    pub fn team_ttl_seconds() -> u64 {
        env_parse("CACHE_TEAM_TTL_SECONDS", 600)
    }

    pub fn standings_ttl_seconds() -> u64 {
        env_parse("CACHE_STANDINGS_TTL_SECONDS", 300)
    }

    pub fn user_ttl_seconds() -> u64 {
        env_parse("CACHE_USER_TTL_SECONDS", 600)
    }
}

/// 고정 윈도우 요청 제한 설정
pub struct RateLimitConfig;

impl RateLimitConfig {
    pub fn window_seconds() -> u64 {
        env_parse("RATE_LIMIT_WINDOW_SECONDS", 60)
    }

    /// 로그인/회원가입 엔드포인트 한도
    pub fn auth_max_requests() -> u32 {
        env_parse("RATE_LIMIT_AUTH_MAX_REQUESTS", 5)
    }

    pub fn default_max_requests() -> u32 {
        env_parse("RATE_LIMIT_DEFAULT_MAX_REQUESTS", 100)
    }

    /// 리버스 프록시 뒤에서만 `true`. 그 외에는 연결 주소로만 클라이언트를 구분합니다.
    pub fn trust_proxy_headers() -> bool {
        env_parse("RATE_LIMIT_TRUST_PROXY_HEADERS", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            CorsConfig::parse_origins(" http://a.gg , ,http://b.gg"),
            vec!["http://a.gg".to_string(), "http://b.gg".to_string()]
        );
    }

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        assert_eq!(env_parse::<u32>("THIS_KEY_IS_NEVER_SET_FOR_TESTS", 5), 5);
    }

    #[test]
    fn test_rate_limit_defaults() {
        if env::var("RATE_LIMIT_AUTH_MAX_REQUESTS").is_err() {
            assert_eq!(RateLimitConfig::auth_max_requests(), 5);
        }
        if env::var("RATE_LIMIT_WINDOW_SECONDS").is_err() {
            assert_eq!(RateLimitConfig::window_seconds(), 60);
        }
    }
}
