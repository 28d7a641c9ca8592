pub mod dashboard;
pub mod receipt;
pub mod sessions;

pub use receipt::{ReceiptRenderer, RenderedReceipt};
pub use sessions::SessionStore;
