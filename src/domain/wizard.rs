//! Two-step bill entry wizard.
//!
//! `SellerInfo -> LineItems -> (finalize) -> SellerInfo`. The state is plain data;
//! callers hold one per session and reset it after a successful submission.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::domain::bill::{Bill, LineItem, Seller};
use crate::utils::format::to_whole_units;
use crate::validation::{
    sanitize_string, validate_non_negative, validate_seller_address, validate_seller_id,
    validate_seller_name, ValidationError,
};

pub const MAX_ITEMS: usize = 5;
pub const MIN_ITEMS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SellerInfo,
    LineItems,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("action requires step {expected:?} but wizard is at {actual:?}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("no line item at position {index} (bill has {len})")]
    NoSuchItem { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    step: WizardStep,
    seller: Seller,
    items: Vec<LineItem>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::SellerInfo,
            seller: Seller::default(),
            items: vec![LineItem::default()],
        }
    }
}

impl WizardState {
    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn seller(&self) -> &Seller {
        &self.seller
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Stores the seller fields, then advances when all three are present.
    /// The fields are kept even when validation fails so the form can be re-shown.
    pub fn submit_seller(&mut self, seller: Seller) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SellerInfo)?;

        self.seller = Seller {
            name: sanitize_string(&seller.name),
            id_number: sanitize_string(&seller.id_number),
            address: sanitize_string(&seller.address),
        };

        validate_seller_name(&self.seller.name)?;
        validate_seller_id(&self.seller.id_number)?;
        validate_seller_address(&self.seller.address)?;

        self.step = WizardStep::LineItems;
        Ok(())
    }

    /// Appends a blank item. A no-op once the bill holds `MAX_ITEMS`.
    pub fn add_item(&mut self) -> Result<usize, WizardError> {
        self.expect_step(WizardStep::LineItems)?;
        if self.items.len() < MAX_ITEMS {
            self.items.push(LineItem::default());
        }
        Ok(self.items.len())
    }

    /// Drops the last item. A no-op at `MIN_ITEMS`.
    pub fn remove_last_item(&mut self) -> Result<usize, WizardError> {
        self.expect_step(WizardStep::LineItems)?;
        if self.items.len() > MIN_ITEMS {
            self.items.pop();
        }
        Ok(self.items.len())
    }

    /// Replaces the item at `index`. The item amount and the resulting bill
    /// total must both be expressible in whole dong, or the receipt cannot print.
    pub fn update_item(&mut self, index: usize, item: LineItem) -> Result<(), WizardError> {
        self.expect_step(WizardStep::LineItems)?;
        validate_non_negative("weight", &item.weight)?;

        let len = self.items.len();
        if index >= len {
            return Err(WizardError::NoSuchItem { index, len });
        }

        let amount = item.amount();
        if to_whole_units(&amount).is_none() {
            return Err(ValidationError::new("amount", "is too large").into());
        }
        let total = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .fold(amount, |sum, (_, other)| sum + other.amount());
        if to_whole_units(&total).is_none() {
            return Err(ValidationError::new("total", "is too large").into());
        }

        self.items[index] = item;
        Ok(())
    }

    /// Returns to the seller step. Seller fields and items are preserved.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::LineItems)?;
        self.step = WizardStep::SellerInfo;
        Ok(())
    }

    /// Builds the bill without touching the state; reset only once it has been stored.
    pub fn finalize(&self, timestamp: NaiveDateTime) -> Result<Bill, WizardError> {
        self.expect_step(WizardStep::LineItems)?;
        Ok(Bill {
            timestamp,
            seller: self.seller.clone(),
            items: self.items.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bill::GoldType;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn seller(name: &str, id_number: &str, address: &str) -> Seller {
        Seller {
            name: name.to_string(),
            id_number: id_number.to_string(),
            address: address.to_string(),
        }
    }

    fn at_line_items() -> WizardState {
        let mut state = WizardState::default();
        state
            .submit_seller(seller("Nguyen Van A", "123456789", "Hanoi"))
            .expect("valid seller");
        state
    }

    #[test]
    fn starts_at_seller_info_with_one_item() {
        let state = WizardState::default();
        assert_eq!(state.step(), WizardStep::SellerInfo);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.seller(), &Seller::default());
    }

    #[test]
    fn valid_seller_advances() {
        let state = at_line_items();
        assert_eq!(state.step(), WizardStep::LineItems);
        assert_eq!(state.seller().name, "Nguyen Van A");
    }

    #[test]
    fn any_empty_seller_field_blocks_transition() {
        let cases = [
            seller("", "123456789", "Hanoi"),
            seller("Nguyen Van A", "   ", "Hanoi"),
            seller("Nguyen Van A", "123456789", ""),
        ];

        for case in cases {
            let mut state = WizardState::default();
            let err = state.submit_seller(case.clone()).unwrap_err();
            assert!(matches!(err, WizardError::Validation(_)));
            assert_eq!(state.step(), WizardStep::SellerInfo);
            assert_eq!(state.seller().name, case.name.trim());
        }
    }

    #[test]
    fn item_count_stays_within_bounds() {
        let mut state = at_line_items();

        for _ in 0..10 {
            let len = state.add_item().expect("at line items");
            assert!(len <= MAX_ITEMS);
        }
        assert_eq!(state.items().len(), MAX_ITEMS);

        for _ in 0..10 {
            let len = state.remove_last_item().expect("at line items");
            assert!(len >= MIN_ITEMS);
        }
        assert_eq!(state.items().len(), MIN_ITEMS);
    }

    #[test]
    fn item_actions_rejected_at_seller_step() {
        let mut state = WizardState::default();
        assert_eq!(
            state.add_item(),
            Err(WizardError::WrongStep {
                expected: WizardStep::LineItems,
                actual: WizardStep::SellerInfo,
            })
        );
        assert!(state.remove_last_item().is_err());
        assert!(state.back().is_err());
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn update_item_checks_index_and_weight() {
        let mut state = at_line_items();
        let item = LineItem::new(BigDecimal::from(5), GoldType::Karat24, 6_000_000);

        state.update_item(0, item.clone()).expect("valid update");
        assert_eq!(state.items()[0], item);

        assert_eq!(
            state.update_item(3, item.clone()),
            Err(WizardError::NoSuchItem { index: 3, len: 1 })
        );

        let negative = LineItem::new(BigDecimal::from(-1), GoldType::Sjc, 1);
        assert!(matches!(
            state.update_item(0, negative),
            Err(WizardError::Validation(_))
        ));
    }

    #[test]
    fn update_item_rejects_amounts_that_cannot_print() {
        let mut state = at_line_items();
        let huge = LineItem::new(
            BigDecimal::from_str("100000000000000").expect("valid decimal"),
            GoldType::Sjc,
            6_000_000,
        );

        let err = state.update_item(0, huge).unwrap_err();
        assert!(matches!(err, WizardError::Validation(ref e) if e.field == "amount"));
        assert_eq!(state.items()[0], LineItem::default());

        // Each item fits on its own, but together they overflow the total
        let half = LineItem::new(
            BigDecimal::from(u64::MAX / 2 + 1),
            GoldType::Sjc,
            1,
        );
        state.add_item().expect("at line items");
        state.update_item(0, half.clone()).expect("fits alone");
        let err = state.update_item(1, half.clone()).unwrap_err();
        assert!(matches!(err, WizardError::Validation(ref e) if e.field == "total"));

        // Replacing the same slot does not count the old item twice
        state.update_item(0, half).expect("replaces in place");
    }

    #[test]
    fn seller_fields_split_on_tabs_and_newlines() {
        let mut state = WizardState::default();
        state
            .submit_seller(seller("Nguyen\tVan A", "123456789", "12 Hàng Bạc\nHà Nội"))
            .expect("valid seller");

        assert_eq!(state.seller().name, "Nguyen Van A");
        assert_eq!(state.seller().address, "12 Hàng Bạc Hà Nội");
    }

    #[test]
    fn back_preserves_fields() {
        let mut state = at_line_items();
        state.add_item().expect("at line items");
        state.back().expect("at line items");

        assert_eq!(state.step(), WizardStep::SellerInfo);
        assert_eq!(state.seller().id_number, "123456789");
        assert_eq!(state.items().len(), 2);
    }

    #[test]
    fn finalize_then_reset() {
        let mut state = at_line_items();
        let item = LineItem::new(
            BigDecimal::from_str("5.00").expect("valid decimal"),
            GoldType::Sjc,
            6_000_000,
        );
        state.update_item(0, item).expect("valid update");

        let timestamp = NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");
        let bill = state.finalize(timestamp).expect("at line items");

        assert_eq!(bill.total(), BigDecimal::from(30_000_000));
        assert_eq!(state.step(), WizardStep::LineItems);

        state.reset();
        assert_eq!(state, WizardState::default());
    }

    #[test]
    fn finalize_requires_line_items_step() {
        let state = WizardState::default();
        let timestamp = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp");
        assert!(state.finalize(timestamp).is_err());
    }
}
