//! Shop client: guest and account carts kept in step with the shop REST API.

pub mod admin;
pub mod auth;
pub mod context;
pub mod domain;
pub mod http;
pub mod storage;

#[cfg(test)]
mod test;
