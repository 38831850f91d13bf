pub mod accounts;
pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod migrator;
pub mod normalize;
pub mod notifications;
pub mod security;
pub mod telemetry;
pub mod upload;

pub use sea_orm;
