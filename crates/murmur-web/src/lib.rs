pub mod routes;
pub mod server;

mod error;

pub use error::{Result, WebError};
pub use routes::router;
pub use server::start_server;
