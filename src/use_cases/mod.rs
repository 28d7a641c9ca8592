pub mod submit_bill;

pub use submit_bill::{SubmitBill, SubmitOutput};
