pub mod clean;
pub mod doctor;
pub mod ps;
pub mod status;
