pub mod email_verification;

pub use email_verification::{EmailVerification, VerificationType};
