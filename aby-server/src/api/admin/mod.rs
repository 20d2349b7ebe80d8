//! `/admin` endpoints: login flow, own account, admin management, dashboard

pub mod account;
pub mod admins;
pub mod auth;
pub mod dashboard;
