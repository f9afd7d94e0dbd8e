mod media_dto;

pub use media_dto::*;
