use std::sync::Arc;
use mongodb::{bson::{doc, DateTime}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    core::errors::{AppError, AppResult},
    core::registry::Repository,
    db::Database,
    domain::entities::verifications::{EmailVerification, VerificationType},
};

#[repository(name = "verification", collection = "email_verifications")]
pub struct VerificationRepository {
    db: Arc<Database>,
}

impl VerificationRepository {
    pub async fn create(&self, mut verification: EmailVerification) -> AppResult<EmailVerification> {
        let result = self.collection::<EmailVerification>()
            .insert_one(&verification)
            .await?;

        verification.id = result.inserted_id.as_object_id();
        Ok(verification)
    }

    /// 같은 이메일/용도의 가장 최근 미사용 코드
    pub async fn find_latest_unused(
        &self,
        email: &str,
        verification_type: VerificationType,
    ) -> AppResult<Option<EmailVerification>> {
        Ok(self.collection::<EmailVerification>()
            .find_one(doc! {
                "email": email,
                "verification_type": verification_type.as_str(),
                "used_at": { "$exists": false },
            })
            .sort(doc! { "created_at": -1 })
            .await?)
    }

    pub async fn save(&self, verification: &EmailVerification) -> AppResult<()> {
        let object_id = verification.id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 인증 코드입니다".to_string()))?;

        self.collection::<EmailVerification>()
            .replace_one(doc! { "_id": object_id }, verification)
            .await?;
        Ok(())
    }

    /// 새 코드를 발급하기 전에 이전 미사용 코드를 지웁니다.
    pub async fn delete_unused(&self, email: &str, verification_type: VerificationType) -> AppResult<u64> {
        let result = self.collection::<EmailVerification>()
            .delete_many(doc! {
                "email": email,
                "verification_type": verification_type.as_str(),
                "used_at": { "$exists": false },
            })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn delete_expired(&self, now: DateTime) -> AppResult<u64> {
        let result = self.collection::<EmailVerification>()
            .delete_many(doc! { "expires_at": { "$lt": now } })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let lookup_index = IndexModel::builder()
            .keys(doc! { "email": 1, "verification_type": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("email_type_created".to_string())
                .build())
            .build();

        self.collection::<EmailVerification>()
            .create_indexes([lookup_index])
            .await?;
        Ok(())
    }
}
