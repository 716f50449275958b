pub mod shortcuts;
pub mod status;
pub mod tables;
