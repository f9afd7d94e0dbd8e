mod admin_order_handler;
mod order_handler;

pub use admin_order_handler::*;
pub use order_handler::*;
