//! Client-side state models.

pub mod login;
