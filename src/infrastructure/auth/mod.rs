pub mod middleware;
pub mod request_id;

pub use middleware::{auth_middleware, AuthUser, X_USER_ID};
pub use request_id::{request_id_middleware, RequestId};
