//! HTTP Handlers

mod employees;
mod ping;
mod users;

pub use employees::*;
pub use ping::*;
pub use users::*;
