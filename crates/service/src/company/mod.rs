//! Company record manager: uniqueness of name/email and delete safety.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::CompanyService;
