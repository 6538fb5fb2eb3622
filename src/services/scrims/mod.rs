pub mod scrim_service;

pub use scrim_service::ScrimService;
