pub mod auth;
pub mod entitlement;
pub mod menu;
pub mod metrics;
pub mod purchases;
pub mod reports;
pub mod reviews;
