//! # MongoDB 연결
//!
//! 애플리케이션의 기본 저장소입니다. 부팅 시 한 번 연결하고
//! `ServiceLocator::set()`으로 등록하면, `#[repository]` 매크로가 `db` 필드로 주입합니다.
//!
//! | 환경 변수 | 기본값 |
//! |-----------|--------|
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `DATABASE_NAME` | `team_manager_dev` |

use mongodb::{
    bson::oid::ObjectId,
    error::{ErrorKind, WriteFailure},
    options::ClientOptions,
    Client,
};
use std::env;
use log::info;

use crate::core::errors::{AppResult, ErrorCode};

/// MongoDB 유니크 인덱스 위반 코드
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수로 연결하고 `ping`으로 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "team_manager_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("team_manager".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    /// `#[repository]` 매크로의 `collection()`이 사용합니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

/// 경로 파라미터의 문자열 ID를 `ObjectId`로 변환합니다.
pub fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ErrorCode::InvalidId.error())
}

/// 유니크 인덱스 위반 여부
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_object_id("not-an-id").unwrap_err().code(), ErrorCode::InvalidId);
    }
}
