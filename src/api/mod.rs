pub mod auth;
pub mod cattle;
pub mod complaints;
pub mod inaph;
