//! API endpoint implementations.

mod follows;
mod users;

pub use follows::FollowsApi;
pub use users::UsersApi;
