//! # 애플리케이션 에러 체계
//!
//! 모든 계층이 공유하는 닫힌 에러 분류와, 이를 HTTP 응답 봉투로 바꾸는 규칙을 정의합니다.
//!
//! ## 분류
//!
//! | 분류 | HTTP | 용도 |
//! |------|------|------|
//! | `NotFound` | 404 | 대상 리소스 없음 |
//! | `Duplicate` | 409 | 유니크 제약 위반 |
//! | `InvalidState` | 409 | 현재 상태에서 허용되지 않는 전이 |
//! | `Validation` | 400 | 입력값 검증 실패 (필드별 상세 포함) |
//! | `Authentication` | 401 | 자격 증명/토큰 문제 |
//! | `Forbidden` | 403 | 권한 부족, 계정 상태로 인한 거부 |
//! | `TooManyRequests` | 429 | 요청 한도 초과 |
//! | 인프라 에러 | 500 | DB/Redis/외부 서비스/내부 오류 |
//!
//! 도메인 에러는 항상 [`ErrorCode`]를 가지며, 클라이언트는 메시지 대신 코드로 분기합니다.
//!
//! ## 응답 봉투
//!
//! ```json
//! {
//!   "status": 409,
//!   "error": "Conflict",
//!   "code": "NICKNAME_CHANGE_COOLDOWN",
//!   "message": "닉네임은 30일에 한 번만 변경할 수 있습니다. 12일 후에 다시 시도해주세요",
//!   "path": "/users/me/nickname",
//!   "details": null
//! }
//! ```
//!
//! `path`는 [`crate::middlewares::ErrorEnvelope`] 미들웨어가 요청 경로로 채웁니다.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 에러 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    InvalidState,
    Validation,
    Authentication,
    Forbidden,
    TooManyRequests,
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Duplicate | ErrorKind::InvalidState => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 기계 판독용 에러 코드
///
/// 직렬화 시 `SCREAMING_SNAKE_CASE` 문자열로 내려갑니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 404
    UserNotFound,
    TeamNotFound,
    MemberNotFound,
    InvitationNotFound,
    ScrimNotFound,
    StrategyNotFound,
    VerificationNotFound,
    EndpointNotFound,

    // 409 (중복)
    EmailAlreadyExists,
    NicknameAlreadyExists,
    TeamNameAlreadyExists,
    AlreadyTeamMember,
    InvitationAlreadyPending,
    OauthEmailConflict,

    // 409 (상태)
    InvalidAccountStatus,
    NicknameChangeCooldown,
    AccountNotLocked,
    AccountNotDormant,
    InvitationNotPending,
    InvitationExpired,
    VerificationExpired,
    VerificationAttemptsExceeded,
    InvalidScrimStatus,
    OwnerCannotLeave,

    // 400
    InvalidInput,
    InvalidId,
    InvalidMatchResult,

    // 401
    AuthenticationRequired,
    InvalidCredentials,
    InvalidToken,
    TokenRevoked,
    VerificationCodeMismatch,
    InvalidOauthState,

    // 403
    AccessDenied,
    EmailNotVerified,
    AccountLocked,
    AccountDormant,
    NotTeamMember,
    InsufficientTeamRole,
    InvitationEmailMismatch,

    // 429
    RateLimitExceeded,

    // 500
    InternalServerError,
    ExternalServiceError,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;
        match self {
            UserNotFound | TeamNotFound | MemberNotFound | InvitationNotFound | ScrimNotFound
            | StrategyNotFound | VerificationNotFound | EndpointNotFound => ErrorKind::NotFound,

            EmailAlreadyExists | NicknameAlreadyExists | TeamNameAlreadyExists
            | AlreadyTeamMember | InvitationAlreadyPending | OauthEmailConflict => ErrorKind::Duplicate,

            InvalidAccountStatus | NicknameChangeCooldown | AccountNotLocked | AccountNotDormant
            | InvitationNotPending | InvitationExpired | VerificationExpired
            | VerificationAttemptsExceeded | InvalidScrimStatus | OwnerCannotLeave => ErrorKind::InvalidState,

            InvalidInput | InvalidId | InvalidMatchResult => ErrorKind::Validation,

            AuthenticationRequired | InvalidCredentials | InvalidToken | TokenRevoked
            | VerificationCodeMismatch | InvalidOauthState => ErrorKind::Authentication,

            AccessDenied | EmailNotVerified | AccountLocked | AccountDormant | NotTeamMember
            | InsufficientTeamRole | InvitationEmailMismatch => ErrorKind::Forbidden,

            RateLimitExceeded => ErrorKind::TooManyRequests,

            InternalServerError | ExternalServiceError => ErrorKind::Internal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            UserNotFound => "USER_NOT_FOUND",
            TeamNotFound => "TEAM_NOT_FOUND",
            MemberNotFound => "MEMBER_NOT_FOUND",
            InvitationNotFound => "INVITATION_NOT_FOUND",
            ScrimNotFound => "SCRIM_NOT_FOUND",
            StrategyNotFound => "STRATEGY_NOT_FOUND",
            VerificationNotFound => "VERIFICATION_NOT_FOUND",
            EndpointNotFound => "ENDPOINT_NOT_FOUND",
            EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            NicknameAlreadyExists => "NICKNAME_ALREADY_EXISTS",
            TeamNameAlreadyExists => "TEAM_NAME_ALREADY_EXISTS",
            AlreadyTeamMember => "ALREADY_TEAM_MEMBER",
            InvitationAlreadyPending => "INVITATION_ALREADY_PENDING",
            OauthEmailConflict => "OAUTH_EMAIL_CONFLICT",
            InvalidAccountStatus => "INVALID_ACCOUNT_STATUS",
            NicknameChangeCooldown => "NICKNAME_CHANGE_COOLDOWN",
            AccountNotLocked => "ACCOUNT_NOT_LOCKED",
            AccountNotDormant => "ACCOUNT_NOT_DORMANT",
            InvitationNotPending => "INVITATION_NOT_PENDING",
            InvitationExpired => "INVITATION_EXPIRED",
            VerificationExpired => "VERIFICATION_EXPIRED",
            VerificationAttemptsExceeded => "VERIFICATION_ATTEMPTS_EXCEEDED",
            InvalidScrimStatus => "INVALID_SCRIM_STATUS",
            OwnerCannotLeave => "OWNER_CANNOT_LEAVE",
            InvalidInput => "INVALID_INPUT",
            InvalidId => "INVALID_ID",
            InvalidMatchResult => "INVALID_MATCH_RESULT",
            AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            InvalidCredentials => "INVALID_CREDENTIALS",
            InvalidToken => "INVALID_TOKEN",
            TokenRevoked => "TOKEN_REVOKED",
            VerificationCodeMismatch => "VERIFICATION_CODE_MISMATCH",
            InvalidOauthState => "INVALID_OAUTH_STATE",
            AccessDenied => "ACCESS_DENIED",
            EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AccountLocked => "ACCOUNT_LOCKED",
            AccountDormant => "ACCOUNT_DORMANT",
            NotTeamMember => "NOT_TEAM_MEMBER",
            InsufficientTeamRole => "INSUFFICIENT_TEAM_ROLE",
            InvitationEmailMismatch => "INVITATION_EMAIL_MISMATCH",
            RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            InternalServerError => "INTERNAL_SERVER_ERROR",
            ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// 사용자에게 노출해도 안전한 기본 메시지
    pub fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            UserNotFound => "사용자를 찾을 수 없습니다",
            TeamNotFound => "팀을 찾을 수 없습니다",
            MemberNotFound => "팀 멤버를 찾을 수 없습니다",
            InvitationNotFound => "초대를 찾을 수 없습니다",
            ScrimNotFound => "스크림을 찾을 수 없습니다",
            StrategyNotFound => "전략을 찾을 수 없습니다",
            VerificationNotFound => "유효한 인증 요청이 없습니다",
            EndpointNotFound => "요청한 경로를 찾을 수 없습니다",
            EmailAlreadyExists => "이미 사용 중인 이메일입니다",
            NicknameAlreadyExists => "이미 사용 중인 닉네임입니다",
            TeamNameAlreadyExists => "이미 사용 중인 팀 이름입니다",
            AlreadyTeamMember => "이미 팀에 소속된 사용자입니다",
            InvitationAlreadyPending => "이미 대기 중인 초대가 있습니다",
            OauthEmailConflict => "해당 이메일은 다른 로그인 방식으로 가입되어 있습니다",
            InvalidAccountStatus => "현재 계정 상태에서는 요청을 처리할 수 없습니다",
            NicknameChangeCooldown => "닉네임은 30일에 한 번만 변경할 수 있습니다",
            AccountNotLocked => "잠긴 계정이 아닙니다",
            AccountNotDormant => "휴면 계정이 아닙니다",
            InvitationNotPending => "이미 처리된 초대입니다",
            InvitationExpired => "만료된 초대입니다",
            VerificationExpired => "인증 코드가 만료되었습니다",
            VerificationAttemptsExceeded => "인증 시도 횟수를 초과했습니다. 코드를 다시 요청해주세요",
            InvalidScrimStatus => "현재 스크림 상태에서는 요청을 처리할 수 없습니다",
            OwnerCannotLeave => "팀 소유자는 팀을 떠날 수 없습니다. 소유권을 먼저 이전해주세요",
            InvalidInput => "입력값이 올바르지 않습니다",
            InvalidId => "유효하지 않은 ID 형식입니다",
            InvalidMatchResult => "경기 결과가 올바르지 않습니다",
            AuthenticationRequired => "유효한 인증 토큰이 필요합니다",
            InvalidCredentials => "이메일 또는 비밀번호가 올바르지 않습니다",
            InvalidToken => "유효하지 않은 토큰입니다",
            TokenRevoked => "폐기된 토큰입니다",
            VerificationCodeMismatch => "인증 코드가 일치하지 않습니다",
            InvalidOauthState => "유효하지 않은 OAuth state 입니다",
            AccessDenied => "접근 권한이 없습니다",
            EmailNotVerified => "이메일 인증이 완료되지 않았습니다",
            AccountLocked => "로그인 실패 횟수 초과로 계정이 잠겼습니다",
            AccountDormant => "휴면 계정입니다. 재활성화 후 이용해주세요",
            NotTeamMember => "팀 멤버만 접근할 수 있습니다",
            InsufficientTeamRole => "팀 내 권한이 부족합니다",
            InvitationEmailMismatch => "초대받은 이메일과 로그인한 계정이 다릅니다",
            RateLimitExceeded => "요청이 너무 많습니다. 잠시 후 다시 시도해주세요",
            InternalServerError => "서버 내부 오류가 발생했습니다",
            ExternalServiceError => "외부 서비스 호출에 실패했습니다",
        }
    }

    /// 기본 메시지로 에러 생성
    pub fn error(self) -> AppError {
        self.with_message(self.message())
    }

    /// 메시지를 지정해 에러 생성
    pub fn with_message(self, message: impl Into<String>) -> AppError {
        let message = message.into();
        match self.kind() {
            ErrorKind::NotFound => AppError::NotFound(self, message),
            ErrorKind::Duplicate => AppError::Duplicate(self, message),
            ErrorKind::InvalidState => AppError::InvalidState(self, message),
            ErrorKind::Validation => AppError::Validation {
                code: self,
                message,
                details: Vec::new(),
            },
            ErrorKind::Authentication => AppError::Authentication(self, message),
            ErrorKind::Forbidden => AppError::Forbidden(self, message),
            ErrorKind::TooManyRequests => AppError::TooManyRequests { retry_after_secs: 1 },
            ErrorKind::Internal => AppError::InternalError(message),
        }
    }
}

/// 필드 단위 검증 실패 상세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{1}")]
    NotFound(ErrorCode, String),

    #[error("{1}")]
    Duplicate(ErrorCode, String),

    #[error("{1}")]
    InvalidState(ErrorCode, String),

    #[error("{message}")]
    Validation {
        code: ErrorCode,
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{1}")]
    Authentication(ErrorCode, String),

    #[error("{1}")]
    Forbidden(ErrorCode, String),

    #[error("Too many requests, retry after {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Redis error: {0}")]
    RedisError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 필드 하나에 대한 검증 에러
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        AppError::Validation {
            code: ErrorCode::InvalidInput,
            message: message.clone(),
            details: vec![FieldError {
                field: field.to_string(),
                message,
            }],
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(code, _)
            | AppError::Duplicate(code, _)
            | AppError::InvalidState(code, _)
            | AppError::Authentication(code, _)
            | AppError::Forbidden(code, _) => *code,
            AppError::Validation { code, .. } => *code,
            AppError::TooManyRequests { .. } => ErrorCode::RateLimitExceeded,
            AppError::ExternalServiceError(_) => ErrorCode::ExternalServiceError,
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// 응답 본문에 실을 메시지. 인프라 에러는 내부 정보를 숨깁니다.
    pub fn client_message(&self) -> String {
        match self {
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_)
            | AppError::TooManyRequests { .. } => self.code().message().to_string(),
            other => other.to_string(),
        }
    }

    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            AppError::Validation { details, .. } if !details.is_empty() => Some(details),
            _ => None,
        }
    }

    /// 경로를 포함한 응답 봉투를 생성합니다.
    pub fn to_envelope(&self, path: &str) -> ErrorBody {
        let status = self.status_code();
        ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            code: self.code().as_str().to_string(),
            message: self.client_message(),
            path: path.to_string(),
            details: self.details().map(|d| d.to_vec()),
        }
    }

    /// 경로를 포함한 HTTP 응답을 생성합니다.
    pub fn to_response(&self, path: &str) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests { retry_after_secs } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        builder.json(self.to_envelope(path))
    }
}

/// 에러 응답 봉투
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub code: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            other => other.code().kind().status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("요청 처리 중 내부 오류: {}", self);
        }
        // path는 ErrorEnvelope 미들웨어가 채움
        self.to_response("")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation {
            code: ErrorCode::InvalidInput,
            message: ErrorCode::InvalidInput.message().to_string(),
            details,
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl From<tokio_cron_scheduler::JobSchedulerError> for AppError {
    fn from(e: tokio_cron_scheduler::JobSchedulerError) -> Self {
        AppError::InternalError(format!("스케줄러 오류: {}", e))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_domain_codes_map_to_status() {
        assert_eq!(ErrorCode::TeamNotFound.error().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::EmailAlreadyExists.error().status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::NicknameChangeCooldown.error().status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InvalidMatchResult.error().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidToken.error().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AccountLocked.error().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::TooManyRequests { retry_after_secs: 3 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_fields() {
        let err = ErrorCode::InvitationExpired.error();
        let body = err.to_envelope("/invitations/abc/accept");

        assert_eq!(body.status, 409);
        assert_eq!(body.error, "Conflict");
        assert_eq!(body.code, "INVITATION_EXPIRED");
        assert_eq!(body.message, "만료된 초대입니다");
        assert_eq!(body.path, "/invitations/abc/accept");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_envelope_hides_internal_details() {
        let err = AppError::DatabaseError("connection refused at 10.0.0.3".into());
        let body = err.to_envelope("/teams");

        assert_eq!(body.status, 500);
        assert_eq!(body.code, "INTERNAL_SERVER_ERROR");
        assert!(!body.message.contains("10.0.0.3"));
    }

    #[test]
    fn test_error_code_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::NicknameChangeCooldown).unwrap();
        assert_eq!(json, "\"NICKNAME_CHANGE_COOLDOWN\"");
        assert_eq!(ErrorCode::NicknameChangeCooldown.as_str(), "NICKNAME_CHANGE_COOLDOWN");
        assert_eq!(ErrorCode::OauthEmailConflict.as_str(), "OAUTH_EMAIL_CONFLICT");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(email(message = "이메일 형식이 아닙니다"))]
        email: String,
        #[validate(length(min = 2, message = "너무 짧습니다"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_are_itemized() {
        let sample = Sample {
            email: "nope".into(),
            name: "a".into(),
        };
        let err: AppError = sample.validate().unwrap_err().into();
        let body = err.to_envelope("/auth/register");

        assert_eq!(body.status, 400);
        assert_eq!(body.code, "INVALID_INPUT");
        let details = body.details.expect("details");
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "email");
        assert_eq!(details[0].message, "이메일 형식이 아닙니다");
        assert_eq!(details[1].field, "name");
    }

    #[test]
    fn test_rate_limit_response_has_retry_after() {
        let res = AppError::TooManyRequests { retry_after_secs: 42 }.to_response("/auth/login");
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            res.headers().get(header::RETRY_AFTER).unwrap().to_str().unwrap(),
            "42"
        );
    }
}
