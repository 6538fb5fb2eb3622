use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 팀 전략 보드
///
/// `board`는 프론트엔드가 그리는 자유 형식 JSON(마커, 경로, 메모 등)이며 서버는 해석하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: String,
    pub title: String,
    pub map_name: String,
    #[serde(default)]
    pub board: serde_json::Value,
    pub author_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Strategy {
    pub fn new(
        team_id: String,
        title: String,
        map_name: String,
        board: serde_json::Value,
        author_id: String,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            team_id,
            title,
            map_name,
            board,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_author(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    pub fn apply_update(
        &mut self,
        title: Option<String>,
        map_name: Option<String>,
        board: Option<serde_json::Value>,
        now: DateTime,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(map_name) = map_name {
            self.map_name = map_name;
        }
        if let Some(board) = board {
            self.board = board;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_update_keeps_missing_fields() {
        let mut s = Strategy::new(
            "team".into(),
            "Rush B".into(),
            "Erangel".into(),
            json!({"markers": []}),
            "author".into(),
        );
        let now = DateTime::now();

        s.apply_update(None, Some("Miramar".into()), None, now);

        assert_eq!(s.title, "Rush B");
        assert_eq!(s.map_name, "Miramar");
        assert_eq!(s.board, json!({"markers": []}));
        assert!(s.is_author("author"));
        assert!(!s.is_author("other"));
    }
}
