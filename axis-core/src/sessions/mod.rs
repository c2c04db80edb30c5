pub mod brief;
pub mod copilot;
pub mod debrief;
pub mod intake;
pub mod microsite;
