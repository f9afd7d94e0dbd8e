mod admin_category_handler;
mod category_handler;

pub use admin_category_handler::*;
pub use category_handler::*;
