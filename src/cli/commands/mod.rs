pub mod ai;
pub mod appointments;
pub mod auth;
pub mod clinical;
pub mod dashboard;
pub mod data;
