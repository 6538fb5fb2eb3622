pub mod scrim;

pub use scrim::{MatchResult, Scrim, ScrimMatch, ScrimStatus, TeamStanding};
