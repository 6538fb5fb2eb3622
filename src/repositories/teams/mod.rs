//! 팀, 팀 멤버, 팀 초대 저장소

pub mod team_repository;
pub mod member_repository;
pub mod invitation_repository;

pub use team_repository::TeamRepository;
pub use member_repository::MemberRepository;
pub use invitation_repository::InvitationRepository;
