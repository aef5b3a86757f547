pub mod http;
pub mod mirror;
pub mod model;
pub mod store;

pub use http::*;
pub use mirror::{MirrorError, UserMirror};
pub use model::{CreateUserPayload, UpdateUserPayload, User};
pub use store::{StoreError, UserStore};
