mod promocode;

pub use promocode::{DiscountType, Promocode};
