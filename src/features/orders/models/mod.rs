mod order;

pub use order::{Order, OrderItem, OrderSource, OrderStatus, OrderWithItems};
