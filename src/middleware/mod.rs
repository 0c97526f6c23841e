//! HTTP middleware for the gateways

pub mod auth;
