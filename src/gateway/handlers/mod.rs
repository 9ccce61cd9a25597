pub mod health;
pub mod message;
pub mod order;
pub mod receipt;

pub use health::health_check;
pub use message::list_messages;
pub use order::{create_order, get_order, list_orders};
pub use receipt::{get_receipt, list_receipts};
