use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStrategyRequest {
    #[validate(length(min = 1, message = "팀 ID가 필요합니다"))]
    pub team_id: String,

    #[validate(length(min = 1, max = 100, message = "제목은 1-100자 사이여야 합니다"))]
    pub title: String,

    #[validate(length(min = 1, max = 50, message = "맵 이름은 1-50자 사이여야 합니다"))]
    pub map_name: String,

    #[serde(default)]
    pub board: serde_json::Value,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStrategyRequest {
    #[validate(length(min = 1, max = 100, message = "제목은 1-100자 사이여야 합니다"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 50, message = "맵 이름은 1-50자 사이여야 합니다"))]
    pub map_name: Option<String>,

    pub board: Option<serde_json::Value>,
}
