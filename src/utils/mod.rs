//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정규화
//! - [`time`] - BSON `DateTime` 산술
//! - [`request`] - 클라이언트 IP, Bearer 토큰 추출

pub mod string_utils;
pub mod time;
pub mod request;
