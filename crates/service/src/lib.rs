//! Service layer providing the company and user record managers.
//! - Business rules run against the `store` traits, not a concrete database.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod password;
pub mod cache;
pub mod store;
pub mod company;
pub mod user;
pub mod seed;
#[cfg(test)]
pub mod test_support;
#[cfg(test)]
mod tests;
