//! 주기 작업
//!
//! `tokio-cron-scheduler`로 만료 데이터 정리와 계정 휴면 처리를 돌립니다.
//! 작업 실패는 로그만 남기고 다음 주기에 다시 시도합니다.

pub mod maintenance;

pub use maintenance::start_scheduler;
