pub mod cart;
pub mod coupon;
pub mod effects;
pub mod line_item;
pub mod notification;
pub mod seed;
pub mod summary;

pub use cart::*;
pub use coupon::*;
pub use effects::*;
pub use line_item::*;
pub use notification::*;
pub use summary::*;
