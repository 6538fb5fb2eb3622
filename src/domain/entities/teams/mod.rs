//! 팀, 팀 멤버, 팀 초대 엔티티

pub mod team;
pub mod team_member;
pub mod team_invitation;

pub use team::{Team, TeamRole};
pub use team_member::TeamMember;
pub use team_invitation::{InvitationStatus, TeamInvitation};
