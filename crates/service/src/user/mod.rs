//! User record manager: unique email, company reference, password hashing.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;
