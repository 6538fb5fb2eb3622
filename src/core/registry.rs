//! # Service Registry - 싱글톤 의존성 주입 컨테이너
//!
//! `singleton_macro`의 `#[service]`, `#[repository]` 매크로가 생성하는 등록 정보를
//! 모아서 타입별 싱글톤을 지연 생성하고 공유합니다.
//!
//! ## 동작 순서
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ #[service(name = "team")]       → ServiceRegistration { name: "team_service" }
//!    ├─ #[repository(name = "team", ..)] → RepositoryRegistration { name: "team_repository" }
//!    └─ inventory::collect!              → 전역 목록에 수집
//!
//! 2. 부팅 (main.rs)
//!    ├─ ServiceLocator::set(Arc<Database>)
//!    ├─ ServiceLocator::set(Arc<RedisClient>)
//!    └─ ServiceLocator::initialize_all()  → 리포지토리, 서비스 순으로 생성
//!
//! 3. 주입
//!    └─ Arc<T> 필드 → ServiceLocator::get::<T>()
//!         "TeamService" → "team" → SERVICE_NAME_CACHE["team"]
//! ```
//!
//! 타입 이름에서 `Service`/`Repository` 접미사를 떼고 소문자로 바꾼 값이 등록 이름과
//! 같아야 합니다. 그래서 매크로의 `name` 인자는 항상 한 단어 엔티티 이름을 씁니다.
//!
//! ## 잠금 규칙
//!
//! 생성자는 내부에서 다시 `get`을 호출하므로, 인스턴스 맵의 쓰기 잠금을 잡은 채로
//! 생성자를 부르지 않습니다. 생성 후 잠금을 다시 잡고, 이미 다른 스레드가 넣어둔
//! 인스턴스가 있으면 그것을 우선합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;

/// `#[service]` 매크로가 구현하는 공통 인터페이스
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 공통 인터페이스
///
/// 매크로가 생성하는 `cache_key()`는 이 trait의 `name()`을 사용하므로,
/// 리포지토리 파일에서는 이 trait을 스코프에 가져와야 합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 구성 요소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentKind {
    Repository,
    Service,
}

impl ComponentKind {
    fn suffix(&self) -> &'static str {
        match self {
            ComponentKind::Repository => "Repository",
            ComponentKind::Service => "Service",
        }
    }

    fn registration_suffix(&self) -> &'static str {
        match self {
            ComponentKind::Repository => "_repository",
            ComponentKind::Service => "_service",
        }
    }
}

static SERVICE_NAME_CACHE: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
            .map(|r| (registration_key(r.name, ComponentKind::Service), r.constructor))
            .collect();
        log::debug!("서비스 레지스트리 캐시 구성: {}개", cache.len());
        cache
    });

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
            .map(|r| (registration_key(r.name, ComponentKind::Repository), r.constructor))
            .collect();
        log::debug!("리포지토리 레지스트리 캐시 구성: {}개", cache.len());
        cache
    });

/// `team_service` → `team`
fn registration_key(name: &str, kind: ComponentKind) -> String {
    name.strip_suffix(kind.registration_suffix())
        .unwrap_or(name)
        .to_string()
}

/// `crate::services::teams::TeamService` → (`Service`, `team`)
fn lookup_key(type_name: &str) -> Option<(ComponentKind, String)> {
    let short = short_type_name(type_name);
    [ComponentKind::Repository, ComponentKind::Service]
        .into_iter()
        .find_map(|kind| {
            short
                .strip_suffix(kind.suffix())
                .filter(|entity| !entity.is_empty())
                .map(|entity| (kind, entity.to_lowercase()))
        })
}

fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 싱글톤 컨테이너
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn cached<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        let instances = self.instances.read().unwrap_or_else(|e| e.into_inner());
        instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// 지정된 타입의 싱글톤을 반환합니다.
    ///
    /// # Panics
    ///
    /// - 순환 의존성이 감지된 경우
    /// - 등록되지 않은 타입을 요청한 경우
    /// - 등록된 생성자가 다른 타입을 돌려준 경우
    ///
    /// 모두 부팅 시점의 배선 오류이므로 즉시 실패시킵니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = LOCATOR.cached::<T>() {
            return instance;
        }

        {
            let mut initializing = LOCATOR.initializing.write().unwrap_or_else(|e| e.into_inner());
            if !initializing.insert(type_id) {
                log::error!("순환 의존성 감지: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let created = Self::construct::<T>(type_name);

        LOCATOR
            .initializing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&type_id);

        let instance = match created {
            Ok(instance) => instance,
            Err(reason) => {
                log::error!("인스턴스 생성 실패 ({}): {}", type_name, reason);
                panic!("Failed to create instance for {}: {}", type_name, reason);
            }
        };

        let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
            .clone();
        drop(instances);

        stored
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("Type mismatch in ServiceLocator for {}", type_name))
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Result<Arc<T>, String> {
        let (kind, entity) = lookup_key(type_name).ok_or_else(|| {
            format!(
                "{} is not a #[service]/#[repository] type; register it with ServiceLocator::set()",
                type_name
            )
        })?;

        let cache = match kind {
            ComponentKind::Repository => &*REPOSITORY_NAME_CACHE,
            ComponentKind::Service => &*SERVICE_NAME_CACHE,
        };

        let constructor = cache
            .get(&entity)
            .ok_or_else(|| format!("no {:?} registered for entity '{}'", kind, entity))?;

        constructor()
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| format!("{:?} '{}' has a different type", kind, entity))
    }

    /// 매크로로 관리되지 않는 인프라 인스턴스(Database, RedisClient 등)를 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", short_type_name(type_name));

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 리포지토리를 먼저 만들어 서비스 생성 시점에는 데이터 계층이 준비되어 있도록 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        log::info!("🔄 서비스 레지스트리 초기화 시작");

        let mut repo_count = 0;
        for registration in inventory::iter::<RepositoryRegistration>() {
            let _ = (registration.constructor)();
            log::debug!("  ✓ {}", registration.name);
            repo_count += 1;
        }

        let mut service_count = 0;
        for registration in inventory::iter::<ServiceRegistration>() {
            let _ = (registration.constructor)();
            log::debug!("  ✓ {}", registration.name);
            service_count += 1;
        }

        log::info!(
            "✅ 레지스트리 초기화 완료: 리포지토리 {}개, 서비스 {}개",
            repo_count,
            service_count
        );
        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_key_strips_suffix() {
        assert_eq!(registration_key("team_service", ComponentKind::Service), "team");
        assert_eq!(registration_key("invitation_repository", ComponentKind::Repository), "invitation");
        assert_eq!(registration_key("plain", ComponentKind::Service), "plain");
    }

    #[test]
    fn test_lookup_key_from_type_path() {
        assert_eq!(
            lookup_key("team_manager_backend::services::teams::team_service::TeamService"),
            Some((ComponentKind::Service, "team".to_string()))
        );
        assert_eq!(
            lookup_key("crate::repositories::tokens::BlacklistRepository"),
            Some((ComponentKind::Repository, "blacklist".to_string()))
        );
        assert_eq!(lookup_key("crate::db::Database"), None);
        assert_eq!(lookup_key("Service"), None);
    }

    struct Settings {
        value: u32,
    }

    #[test]
    fn test_set_then_get_returns_same_instance() {
        ServiceLocator::set(Arc::new(Settings { value: 7 }));
        let a = ServiceLocator::get::<Settings>();
        let b = ServiceLocator::get::<Settings>();

        assert_eq!(a.value, 7);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
