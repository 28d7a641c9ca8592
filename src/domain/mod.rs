pub mod bill;
pub mod wizard;

pub use bill::{Bill, BillRecord, GoldType, LineItem, Seller};
pub use wizard::{WizardError, WizardState, WizardStep, MAX_ITEMS, MIN_ITEMS};
