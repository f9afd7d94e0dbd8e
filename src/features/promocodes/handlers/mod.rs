mod admin_promocode_handler;
mod promocode_handler;

pub use admin_promocode_handler::*;
pub use promocode_handler::*;
