use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateScrimRequest {
    #[validate(length(min = 1, max = 100, message = "제목은 1-100자 사이여야 합니다"))]
    pub title: String,

    #[validate(length(min = 1, message = "주최 팀 ID가 필요합니다"))]
    pub host_team_id: String,

    #[validate(length(min = 2, max = 32, message = "참가 팀은 2-32팀이어야 합니다"))]
    pub participant_team_ids: Vec<String>,

    /// RFC 3339
    pub scheduled_at: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScrimRequest {
    #[validate(length(min = 1, max = 100, message = "제목은 1-100자 사이여야 합니다"))]
    pub title: Option<String>,

    /// RFC 3339
    pub scheduled_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MatchResultRequest {
    #[validate(length(min = 1, message = "팀 ID가 필요합니다"))]
    pub team_id: String,

    #[validate(range(min = 1, message = "순위는 1 이상이어야 합니다"))]
    pub placement: u32,

    #[serde(default)]
    pub kills: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordRoundRequest {
    #[validate(length(min = 1, max = 50, message = "맵 이름은 1-50자 사이여야 합니다"))]
    pub map_name: String,

    #[validate(length(min = 2, message = "2팀 이상의 결과가 필요합니다"))]
    #[validate(nested)]
    pub results: Vec<MatchResultRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_request_validates_nested_results() {
        let request: RecordRoundRequest = serde_json::from_str(
            r#"{"map_name": "Erangel", "results": [
                {"team_id": "a", "placement": 1, "kills": 3},
                {"team_id": "b", "placement": 0}
            ]}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());

        let ok: RecordRoundRequest = serde_json::from_str(
            r#"{"map_name": "Erangel", "results": [
                {"team_id": "a", "placement": 1, "kills": 3},
                {"team_id": "b", "placement": 2}
            ]}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.results[1].kills, 0);
    }

    #[test]
    fn test_record_round_request_needs_two_results() {
        let request: RecordRoundRequest = serde_json::from_str(
            r#"{"map_name": "Miramar", "results": [{"team_id": "a", "placement": 1}]}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("results"));
    }
}
