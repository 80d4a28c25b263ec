pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;

pub use handlers::{AppState, SharedState};
pub use routes::create_router;
pub use session::{Session, Sessions, SESSION_COOKIE};
