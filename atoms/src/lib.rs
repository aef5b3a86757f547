//! Core building blocks of the rollcall API: the user store, its HTTP
//! handlers, the response envelope, the health check and static files.

pub mod assets;
pub mod health;
pub mod response;
pub mod users;
