//! # 스크림 (연습 경기)
//!
//! 한 스크림은 여러 팀이 참가하고, 순서가 있는 라운드(`ScrimMatch`)로 구성됩니다.
//! 각 라운드에는 참가 팀마다 정확히 하나의 결과(순위, 킬 수)가 기록됩니다.
//!
//! ```text
//! SCHEDULED ──start()──▶ IN_PROGRESS ──complete()──▶ COMPLETED
//!     │                      │
//!     └──────cancel()────────┴──────────────────────▶ CANCELLED
//! ```
//!
//! SCHEDULED 상태에서 라운드를 기록하면 자동으로 IN_PROGRESS가 됩니다.

use std::collections::{HashMap, HashSet};

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrimStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ScrimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrimStatus::Scheduled => "SCHEDULED",
            ScrimStatus::InProgress => "IN_PROGRESS",
            ScrimStatus::Completed => "COMPLETED",
            ScrimStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team_id: String,
    /// 1부터 시작하는 순위
    pub placement: u32,
    pub kills: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrimMatch {
    /// 1부터 시작하는 라운드 번호
    pub round: u32,
    pub map_name: String,
    /// 순위 오름차순으로 저장
    pub results: Vec<MatchResult>,
    pub played_at: DateTime,
}

/// 팀별 누적 성적
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub rank: u32,
    pub team_id: String,
    pub rounds_played: u32,
    pub wins: u32,
    pub total_kills: u32,
    pub average_placement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scrim {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub host_team_id: String,
    pub participant_team_ids: Vec<String>,
    pub scheduled_at: DateTime,
    pub status: ScrimStatus,
    #[serde(default)]
    pub matches: Vec<ScrimMatch>,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn invalid_result(message: impl Into<String>) -> AppError {
    ErrorCode::InvalidMatchResult.with_message(message)
}

impl Scrim {
    /// 참가 팀은 중복 없이 2팀 이상이어야 하며 주최 팀을 포함해야 합니다.
    pub fn new(
        title: String,
        host_team_id: String,
        participant_team_ids: Vec<String>,
        scheduled_at: DateTime,
        created_by: String,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        if !participant_team_ids.iter().all(|id| seen.insert(id.as_str())) {
            return Err(AppError::invalid_field("participant_team_ids", "참가 팀이 중복되었습니다"));
        }
        if participant_team_ids.len() < 2 {
            return Err(AppError::invalid_field("participant_team_ids", "스크림에는 2팀 이상이 필요합니다"));
        }
        if !seen.contains(host_team_id.as_str()) {
            return Err(AppError::invalid_field("participant_team_ids", "주최 팀이 참가 팀에 포함되어야 합니다"));
        }

        let now = DateTime::now();
        Ok(Self {
            id: None,
            title,
            host_team_id,
            participant_team_ids,
            scheduled_at,
            status: ScrimStatus::Scheduled,
            matches: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.participant_team_ids.iter().any(|id| id == team_id)
    }

    fn transition(&mut self, allowed: &[ScrimStatus], next: ScrimStatus, now: DateTime) -> AppResult<()> {
        if !allowed.contains(&self.status) {
            return Err(ErrorCode::InvalidScrimStatus.with_message(format!(
                "{} 상태의 스크림은 {}(으)로 바꿀 수 없습니다",
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn start(&mut self, now: DateTime) -> AppResult<()> {
        self.transition(&[ScrimStatus::Scheduled], ScrimStatus::InProgress, now)
    }

    pub fn complete(&mut self, now: DateTime) -> AppResult<()> {
        self.transition(&[ScrimStatus::InProgress], ScrimStatus::Completed, now)
    }

    pub fn cancel(&mut self, now: DateTime) -> AppResult<()> {
        self.transition(
            &[ScrimStatus::Scheduled, ScrimStatus::InProgress],
            ScrimStatus::Cancelled,
            now,
        )
    }

    /// 제목/일정 변경 (SCHEDULED 상태만)
    pub fn reschedule(&mut self, title: Option<String>, scheduled_at: Option<DateTime>, now: DateTime) -> AppResult<()> {
        if self.status != ScrimStatus::Scheduled {
            return Err(ErrorCode::InvalidScrimStatus.with_message("예정된 스크림만 수정할 수 있습니다"));
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(at) = scheduled_at {
            self.scheduled_at = at;
        }
        self.updated_at = now;
        Ok(())
    }

    /// 다음 라운드 결과를 기록합니다.
    ///
    /// 참가 팀마다 결과가 정확히 하나씩 있어야 하고, 순위는 1..=N을 중복 없이 채워야 합니다.
    pub fn record_round(&mut self, map_name: String, results: Vec<MatchResult>, now: DateTime) -> AppResult<&ScrimMatch> {
        if matches!(self.status, ScrimStatus::Completed | ScrimStatus::Cancelled) {
            return Err(ErrorCode::InvalidScrimStatus.with_message(format!(
                "{} 상태의 스크림에는 결과를 기록할 수 없습니다",
                self.status.as_str()
            )));
        }

        let results = self.validate_results(results)?;

        if self.status == ScrimStatus::Scheduled {
            self.start(now)?;
        }

        let round = self.matches.len() as u32 + 1;
        self.matches.push(ScrimMatch {
            round,
            map_name,
            results,
            played_at: now,
        });
        self.updated_at = now;

        Ok(&self.matches[self.matches.len() - 1])
    }

    fn validate_results(&self, mut results: Vec<MatchResult>) -> AppResult<Vec<MatchResult>> {
        let team_count = self.participant_team_ids.len();
        if results.len() != team_count {
            return Err(invalid_result(format!(
                "참가 팀 {}개의 결과가 모두 필요합니다 (입력: {}개)",
                team_count,
                results.len()
            )));
        }

        let mut teams = HashSet::new();
        for result in &results {
            if !self.involves(&result.team_id) {
                return Err(invalid_result(format!("참가하지 않은 팀입니다: {}", result.team_id)));
            }
            if !teams.insert(result.team_id.as_str()) {
                return Err(invalid_result(format!("팀 결과가 중복되었습니다: {}", result.team_id)));
            }
        }

        results.sort_by_key(|r| r.placement);
        let sequential = results
            .iter()
            .enumerate()
            .all(|(i, r)| r.placement == i as u32 + 1);
        if !sequential {
            return Err(invalid_result(format!(
                "순위는 1부터 {}까지 중복 없이 입력해야 합니다",
                team_count
            )));
        }

        Ok(results)
    }

    /// 누적 순위표
    ///
    /// 1위 횟수 내림차순, 평균 순위 오름차순, 총 킬 내림차순으로 정렬합니다.
    pub fn standings(&self) -> Vec<TeamStanding> {
        let mut totals: HashMap<&str, (u32, u32, u32, u32)> = self
            .participant_team_ids
            .iter()
            .map(|id| (id.as_str(), (0, 0, 0, 0)))
            .collect();

        for result in self.matches.iter().flat_map(|m| &m.results) {
            if let Some((rounds, wins, kills, placement_sum)) = totals.get_mut(result.team_id.as_str()) {
                *rounds += 1;
                *kills += result.kills;
                *placement_sum += result.placement;
                if result.placement == 1 {
                    *wins += 1;
                }
            }
        }

        let mut standings: Vec<TeamStanding> = totals
            .into_iter()
            .map(|(team_id, (rounds_played, wins, total_kills, placement_sum))| TeamStanding {
                rank: 0,
                team_id: team_id.to_string(),
                rounds_played,
                wins,
                total_kills,
                average_placement: if rounds_played == 0 {
                    0.0
                } else {
                    placement_sum as f64 / rounds_played as f64
                },
            })
            .collect();

        standings.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(a.average_placement.total_cmp(&b.average_placement))
                .then(b.total_kills.cmp(&a.total_kills))
                .then(a.team_id.cmp(&b.team_id))
        });
        for (i, standing) in standings.iter_mut().enumerate() {
            standing.rank = i as u32 + 1;
        }
        standings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrim() -> Scrim {
        Scrim::new(
            "Weekly scrim".into(),
            "t1".into(),
            vec!["t1".into(), "t2".into(), "t3".into()],
            DateTime::now(),
            "u1".into(),
        )
        .unwrap()
    }

    fn result(team: &str, placement: u32, kills: u32) -> MatchResult {
        MatchResult {
            team_id: team.into(),
            placement,
            kills,
        }
    }

    #[test]
    fn test_new_requires_valid_participants() {
        let now = DateTime::now();
        assert!(Scrim::new("s".into(), "t1".into(), vec!["t1".into()], now, "u".into()).is_err());
        assert!(Scrim::new("s".into(), "t1".into(), vec!["t2".into(), "t3".into()], now, "u".into()).is_err());
        assert!(Scrim::new("s".into(), "t1".into(), vec!["t1".into(), "t1".into()], now, "u".into()).is_err());
        assert!(Scrim::new("s".into(), "t1".into(), vec!["t1".into(), "t2".into()], now, "u".into()).is_ok());
    }

    #[test]
    fn test_record_round_orders_and_autostarts() {
        let mut s = scrim();
        let now = DateTime::now();

        let recorded = s
            .record_round(
                "Erangel".into(),
                vec![result("t3", 3, 1), result("t1", 1, 8), result("t2", 2, 4)],
                now,
            )
            .unwrap();
        assert_eq!(recorded.round, 1);
        let order: Vec<_> = recorded.results.iter().map(|r| r.team_id.as_str()).collect();
        assert_eq!(order, vec!["t1", "t2", "t3"]);
        assert_eq!(s.status, ScrimStatus::InProgress);

        let second = s
            .record_round(
                "Miramar".into(),
                vec![result("t1", 2, 2), result("t2", 1, 6), result("t3", 3, 0)],
                now,
            )
            .unwrap();
        assert_eq!(second.round, 2);
    }

    #[test]
    fn test_record_round_rejects_bad_results() {
        let mut s = scrim();
        let now = DateTime::now();

        let missing = s.record_round("m".into(), vec![result("t1", 1, 0), result("t2", 2, 0)], now);
        assert_eq!(missing.unwrap_err().code(), ErrorCode::InvalidMatchResult);

        let duplicate_placement = s.record_round(
            "m".into(),
            vec![result("t1", 1, 0), result("t2", 1, 0), result("t3", 3, 0)],
            now,
        );
        assert_eq!(duplicate_placement.unwrap_err().code(), ErrorCode::InvalidMatchResult);

        let gap = s.record_round(
            "m".into(),
            vec![result("t1", 1, 0), result("t2", 2, 0), result("t3", 4, 0)],
            now,
        );
        assert!(gap.is_err());

        let outsider = s.record_round(
            "m".into(),
            vec![result("t1", 1, 0), result("t2", 2, 0), result("t9", 3, 0)],
            now,
        );
        assert!(outsider.is_err());

        let duplicate_team = s.record_round(
            "m".into(),
            vec![result("t1", 1, 0), result("t1", 2, 0), result("t3", 3, 0)],
            now,
        );
        assert!(duplicate_team.is_err());

        assert!(s.matches.is_empty());
        assert_eq!(s.status, ScrimStatus::Scheduled);
    }

    #[test]
    fn test_closed_scrim_rejects_rounds() {
        let mut s = scrim();
        let now = DateTime::now();
        s.cancel(now).unwrap();

        let err = s
            .record_round("m".into(), vec![result("t1", 1, 0), result("t2", 2, 0), result("t3", 3, 0)], now)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidScrimStatus);
        assert_eq!(s.cancel(now).unwrap_err().code(), ErrorCode::InvalidScrimStatus);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut s = scrim();
        let now = DateTime::now();

        assert!(s.complete(now).is_err());
        s.reschedule(Some("Renamed".into()), None, now).unwrap();
        assert_eq!(s.title, "Renamed");

        s.start(now).unwrap();
        assert!(s.start(now).is_err());
        assert!(s.reschedule(Some("x".into()), None, now).is_err());

        s.complete(now).unwrap();
        assert_eq!(s.status, ScrimStatus::Completed);
    }

    #[test]
    fn test_standings_order() {
        let mut s = scrim();
        let now = DateTime::now();
        s.record_round("a".into(), vec![result("t1", 1, 5), result("t2", 2, 9), result("t3", 3, 1)], now).unwrap();
        s.record_round("b".into(), vec![result("t2", 1, 3), result("t1", 2, 2), result("t3", 3, 7)], now).unwrap();
        s.record_round("c".into(), vec![result("t1", 1, 0), result("t3", 2, 2), result("t2", 3, 1)], now).unwrap();

        let table = s.standings();
        assert_eq!(table.len(), 3);

        assert_eq!(table[0].team_id, "t1");
        assert_eq!(table[0].wins, 2);
        assert_eq!(table[0].total_kills, 7);
        assert_eq!(table[0].rank, 1);

        assert_eq!(table[1].team_id, "t2");
        assert_eq!(table[1].wins, 1);
        assert!((table[1].average_placement - 2.0).abs() < f64::EPSILON);

        assert_eq!(table[2].team_id, "t3");
        assert_eq!(table[2].rounds_played, 3);
        assert_eq!(table[2].rank, 3);
    }

    #[test]
    fn test_standings_before_any_round() {
        let table = scrim().standings();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|s| s.rounds_played == 0 && s.wins == 0));
        let ids: Vec<_> = table.iter().map(|s| s.team_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }
}
