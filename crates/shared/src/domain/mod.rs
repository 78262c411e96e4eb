mod api;
mod auth;
mod pagination;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::auth::AuthUser;
pub use self::pagination::Pagination;
