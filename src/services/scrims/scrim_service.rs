//! 스크림 일정과 라운드 결과
//!
//! 조회는 참가 팀 멤버만, 수정/진행/결과 기록은 주최 팀의 OWNER/LEADER만 할 수 있습니다.
//! 순위표는 `scrim:standings:{id}`로 캐시되며 라운드가 기록되면 무효화됩니다.

use std::collections::HashSet;
use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    caching::redis::RedisClient,
    config::CacheConfig,
    core::errors::{AppError, AppResult, ErrorCode},
    domain::dto::scrims::{
        CreateScrimRequest, RecordRoundRequest, ScrimMatchResponse, ScrimResponse, StandingsResponse,
        UpdateScrimRequest,
    },
    domain::entities::scrims::{MatchResult, Scrim},
    repositories::scrims::ScrimRepository,
    repositories::teams::{MemberRepository, TeamRepository},
    services::teams::TeamService,
    utils::time::parse_rfc3339,
};

pub(crate) fn standings_cache_key(scrim_id: &str) -> String {
    format!("scrim:standings:{}", scrim_id)
}

/// RFC 3339 시각을 읽고 `now` 이후인지 확인합니다.
fn parse_future_time(value: &str, field: &str, now: DateTime) -> AppResult<DateTime> {
    let at = parse_rfc3339(value, field)?;
    if at <= now {
        return Err(AppError::invalid_field(field, "미래 시각이어야 합니다"));
    }
    Ok(at)
}

#[service(name = "scrim")]
pub struct ScrimService {
    scrim_repo: Arc<ScrimRepository>,

    team_repo: Arc<TeamRepository>,

    member_repo: Arc<MemberRepository>,

    team_service: Arc<TeamService>,

    redis: Arc<RedisClient>,
}

impl ScrimService {
    async fn find_scrim(&self, scrim_id: &str) -> AppResult<Scrim> {
        self.scrim_repo
            .find_by_id(scrim_id)
            .await?
            .ok_or_else(|| ErrorCode::ScrimNotFound.error())
    }

    /// 참가 팀 중 하나에 속해 있어야 합니다.
    async fn ensure_visible(&self, scrim: &Scrim, user_id: &str) -> AppResult<()> {
        let memberships = self.member_repo.find_by_user(user_id).await?;
        if memberships.iter().any(|m| scrim.involves(&m.team_id)) {
            return Ok(());
        }
        Err(ErrorCode::NotTeamMember.with_message("참가 팀 멤버만 볼 수 있는 스크림입니다"))
    }

    /// 주최 팀 OWNER/LEADER만 관리할 수 있습니다.
    async fn find_managed(&self, scrim_id: &str, user_id: &str) -> AppResult<Scrim> {
        let scrim = self.find_scrim(scrim_id).await?;
        self.team_service.require_manager(&scrim.host_team_id, user_id).await?;
        Ok(scrim)
    }

    pub async fn create(&self, user_id: &str, request: CreateScrimRequest) -> AppResult<ScrimResponse> {
        self.team_service.require_manager(&request.host_team_id, user_id).await?;
        let scheduled_at = parse_future_time(&request.scheduled_at, "scheduled_at", DateTime::now())?;

        let scrim = Scrim::new(
            request.title.trim().to_string(),
            request.host_team_id,
            request.participant_team_ids,
            scheduled_at,
            user_id.to_string(),
        )?;

        let found: HashSet<String> = self.team_repo
            .find_by_ids(&scrim.participant_team_ids)
            .await?
            .iter()
            .map(|t| t.id_string())
            .collect();
        if let Some(missing) = scrim.participant_team_ids.iter().find(|id| !found.contains(*id)) {
            return Err(ErrorCode::TeamNotFound.with_message(format!("존재하지 않는 팀입니다: {}", missing)));
        }

        let scrim = self.scrim_repo.create(scrim).await?;
        log::info!(
            "스크림 생성: {} host={} teams={}",
            scrim.id_string(), scrim.host_team_id, scrim.participant_team_ids.len()
        );
        Ok(ScrimResponse::from(&scrim))
    }

    pub async fn get(&self, scrim_id: &str, user_id: &str) -> AppResult<ScrimResponse> {
        let scrim = self.find_scrim(scrim_id).await?;
        self.ensure_visible(&scrim, user_id).await?;
        Ok(ScrimResponse::from(&scrim))
    }

    pub async fn list_by_team(&self, team_id: &str, user_id: &str) -> AppResult<Vec<ScrimResponse>> {
        self.team_service.require_member(team_id, user_id).await?;

        let scrims = self.scrim_repo.find_by_team(team_id).await?;
        Ok(scrims.iter().map(ScrimResponse::from).collect())
    }

    pub async fn update(&self, scrim_id: &str, user_id: &str, request: UpdateScrimRequest) -> AppResult<ScrimResponse> {
        let mut scrim = self.find_managed(scrim_id, user_id).await?;
        let now = DateTime::now();

        let scheduled_at = request.scheduled_at
            .as_deref()
            .map(|at| parse_future_time(at, "scheduled_at", now))
            .transpose()?;
        let title = request.title.map(|t| t.trim().to_string());

        scrim.reschedule(title, scheduled_at, now)?;
        self.scrim_repo.save(&scrim).await?;
        Ok(ScrimResponse::from(&scrim))
    }

    pub async fn start(&self, scrim_id: &str, user_id: &str) -> AppResult<ScrimResponse> {
        let mut scrim = self.find_managed(scrim_id, user_id).await?;
        scrim.start(DateTime::now())?;
        self.scrim_repo.save(&scrim).await?;

        log::info!("스크림 시작: {}", scrim_id);
        Ok(ScrimResponse::from(&scrim))
    }

    pub async fn complete(&self, scrim_id: &str, user_id: &str) -> AppResult<ScrimResponse> {
        let mut scrim = self.find_managed(scrim_id, user_id).await?;
        scrim.complete(DateTime::now())?;
        self.scrim_repo.save(&scrim).await?;

        log::info!("스크림 종료: {} ({}라운드)", scrim_id, scrim.matches.len());
        Ok(ScrimResponse::from(&scrim))
    }

    pub async fn cancel(&self, scrim_id: &str, user_id: &str) -> AppResult<ScrimResponse> {
        let mut scrim = self.find_managed(scrim_id, user_id).await?;
        scrim.cancel(DateTime::now())?;
        self.scrim_repo.save(&scrim).await?;

        log::info!("스크림 취소: {}", scrim_id);
        Ok(ScrimResponse::from(&scrim))
    }

    /// 라운드 결과 기록. 예정 상태였다면 자동으로 시작됩니다.
    pub async fn record_round(&self, scrim_id: &str, user_id: &str, request: RecordRoundRequest) -> AppResult<ScrimMatchResponse> {
        let mut scrim = self.find_managed(scrim_id, user_id).await?;

        let results = request.results
            .into_iter()
            .map(|r| MatchResult {
                team_id: r.team_id,
                placement: r.placement,
                kills: r.kills,
            })
            .collect();

        let recorded = ScrimMatchResponse::from(
            scrim.record_round(request.map_name.trim().to_string(), results, DateTime::now())?,
        );
        self.scrim_repo.save(&scrim).await?;
        self.redis.del_or_warn(&standings_cache_key(scrim_id)).await;

        log::info!("스크림 라운드 기록: {} round={}", scrim_id, recorded.round);
        Ok(recorded)
    }

    pub async fn standings(&self, scrim_id: &str, user_id: &str) -> AppResult<StandingsResponse> {
        let key = standings_cache_key(scrim_id);
        let scrim = self.find_scrim(scrim_id).await?;
        self.ensure_visible(&scrim, user_id).await?;

        if let Some(cached) = self.redis.get_or_warn::<StandingsResponse>(&key).await {
            log::debug!("Cache hit: {}", key);
            return Ok(cached);
        }

        let standings = StandingsResponse::from(&scrim);
        self.redis
            .set_or_warn(&key, &standings, CacheConfig::standings_ttl_seconds())
            .await;
        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::from_unix_seconds;

    #[test]
    fn test_schedule_must_be_in_future() {
        let now = from_unix_seconds(1_772_366_400); // 2026-03-01T12:00:00Z

        assert!(parse_future_time("2026-03-02T00:00:00Z", "scheduled_at", now).is_ok());

        let past = parse_future_time("2026-02-28T00:00:00Z", "scheduled_at", now).unwrap_err();
        assert_eq!(past.code(), ErrorCode::InvalidInput);
        assert_eq!(past.details().unwrap()[0].field, "scheduled_at");

        assert!(parse_future_time("next tuesday", "scheduled_at", now).is_err());
    }

    #[test]
    fn test_standings_cache_key() {
        assert_eq!(standings_cache_key("abc"), "scrim:standings:abc");
    }
}
