//! Request middleware for jotter-api.

pub mod cors;
pub mod method;
pub mod recover;
pub mod request_id;

pub use cors::enable_cors;
pub use method::method_not_allowed;
pub use recover::recover_panic;
pub use request_id::MakeRequestUuidV7;
