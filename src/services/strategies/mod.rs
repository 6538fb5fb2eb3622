pub mod strategy_service;

pub use strategy_service::StrategyService;
