//! Users Entity Module
//!
//! 계정 상태 머신을 포함한 `User` 엔티티입니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! let mut user = User::new_email("player@example.com".into(), hashed_password);
//! user.verify_email()?;
//! user.set_initial_nickname("faker".into())?;
//! ```

pub mod user;

pub use user::{AccountStatus, User};
