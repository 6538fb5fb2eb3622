//! 팀, 멤버, 초대 서비스

pub mod team_service;
pub mod invitation_service;

pub use team_service::TeamService;
pub use invitation_service::InvitationService;
