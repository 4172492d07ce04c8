pub mod error;
pub mod extract;
pub mod response;
pub mod route;

pub use error::ApiError;
pub use extract::CurrentUser;
pub use response::ApiResponse;
pub use route::create_router;
