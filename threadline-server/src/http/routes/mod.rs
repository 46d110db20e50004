//! Route handlers organized by resource

pub mod feed;
pub mod health;
pub mod profiles;
pub mod threads;
