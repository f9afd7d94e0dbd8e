mod user;

pub use user::{BanAction, User, UserBan, UserNote};
