mod promocode_service;

pub use promocode_service::{lock_and_evaluate, record_redemption, PromocodeService};
