pub mod roster;
pub mod tutoring;
