pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_support;
