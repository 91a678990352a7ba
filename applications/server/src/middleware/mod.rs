/// Request middleware and extractors
pub mod identity;

pub use identity::{CurrentUser, USER_HEADER};
