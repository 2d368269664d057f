pub mod format;
pub mod json;

pub use format::UserView;
pub use json::ApiJson;
