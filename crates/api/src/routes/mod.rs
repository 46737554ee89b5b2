//! API routes

pub mod admin;
pub mod events;
pub mod health;
pub mod participation;
pub mod rankings;
