pub mod http_handler;
pub mod local;

pub use http_handler::function_handler;
