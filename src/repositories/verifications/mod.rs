pub mod verification_repository;

pub use verification_repository::VerificationRepository;
