pub mod scrim_repository;

pub use scrim_repository::ScrimRepository;
