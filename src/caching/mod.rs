//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 TTL 캐시입니다. 값은 JSON으로 직렬화되며,
//! 캐시 장애는 요청 실패로 이어지지 않습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_or_warn(&format!("team:{}", team_id), &team, 600).await;
//! let cached: Option<TeamDetail> = cache.get_or_warn(&format!("team:{}", team_id)).await;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379   # 우선 적용
//! REDIS_HOST=localhost REDIS_PORT=6379 REDIS_PASSWORD=secret
//! ```

pub mod redis;
