mod admin_page_handler;
mod page_handler;

pub use admin_page_handler::*;
pub use page_handler::*;
