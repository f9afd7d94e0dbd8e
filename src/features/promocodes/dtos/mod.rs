mod promocode_dto;

pub use promocode_dto::*;
