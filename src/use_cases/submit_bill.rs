//! Submit bill use case.
//! Finalizes a session's wizard, appends its rows to the record store and renders the receipt.

use chrono::{Local, NaiveDateTime, SubsecRound};
use std::sync::Arc;

use crate::domain::Bill;
use crate::error::AppError;
use crate::services::receipt::{ReceiptRenderer, RenderedReceipt};
use crate::services::sessions::SessionStore;
use crate::store::RecordStore;

/// Output of the SubmitBill use case.
#[derive(Debug)]
pub struct SubmitOutput {
    pub bill: Bill,
    /// Rows this bill added to the store.
    pub stored_rows: usize,
    pub receipt: RenderedReceipt,
}

pub struct SubmitBill {
    store: Arc<dyn RecordStore>,
    sessions: SessionStore,
    renderer: Arc<ReceiptRenderer>,
}

impl SubmitBill {
    pub fn new(
        store: Arc<dyn RecordStore>,
        sessions: SessionStore,
        renderer: Arc<ReceiptRenderer>,
    ) -> Self {
        Self {
            store,
            sessions,
            renderer,
        }
    }

    pub async fn execute(&self, session_id: &str) -> Result<SubmitOutput, AppError> {
        let now = Local::now().naive_local().trunc_subsecs(0);
        self.execute_at(session_id, now).await
    }

    /// The session stays locked from finalize until the wizard is reset, so a
    /// concurrent edit or second submit waits and then sees the reset wizard.
    /// A failed append leaves the wizard untouched so the user can submit again.
    /// Once the rows are stored the wizard is reset, even if rendering then fails,
    /// so a retry cannot store the same bill twice.
    pub async fn execute_at(
        &self,
        session_id: &str,
        timestamp: NaiveDateTime,
    ) -> Result<SubmitOutput, AppError> {
        let (bill, stored_rows) = {
            let mut wizard = self.sessions.lock(session_id).await;
            let bill = wizard.finalize(timestamp)?;
            let records = bill.records();

            let store_size = match self.store.append(&records).await {
                Ok(size) => size,
                Err(e) => {
                    tracing::error!(session_id, error = %e, "Failed to store bill, wizard kept for retry");
                    return Err(e.into());
                }
            };

            wizard.reset();
            tracing::info!(
                session_id,
                seller = %bill.seller.name,
                items = bill.items.len(),
                total = %bill.total(),
                store_size,
                "Bill stored"
            );
            (bill, records.len())
        };

        let receipt = self.renderer.render(&bill)?;

        Ok(SubmitOutput {
            bill,
            stored_rows,
            receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GoldType, LineItem, Seller, WizardStep};
    use crate::store::CsvRecordStore;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn ready_session(sessions: &SessionStore, session_id: &str, items: usize) {
        sessions
            .update(session_id, |state| {
                state.submit_seller(Seller {
                    name: "Nguyen Van A".to_string(),
                    id_number: "123456789".to_string(),
                    address: "Hanoi".to_string(),
                })?;
                for index in 0..items {
                    if index > 0 {
                        state.add_item()?;
                    }
                    state.update_item(
                        index,
                        LineItem::new(BigDecimal::from(5), GoldType::Sjc, 6_000_000),
                    )?;
                }
                Ok::<_, crate::domain::WizardError>(())
            })
            .await
            .expect("wizard ready");
    }

    fn use_case(dir: &TempDir, sessions: &SessionStore) -> (Arc<CsvRecordStore>, SubmitBill) {
        let store = Arc::new(CsvRecordStore::new(dir.path().join("data.csv")));
        let submit = SubmitBill::new(
            store.clone(),
            sessions.clone(),
            Arc::new(ReceiptRenderer::new("Shop", "Bang_ke", "none.ttf", "none.ttf")),
        );
        (store, submit)
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(9, 5, 7))
            .expect("valid timestamp")
    }

    #[tokio::test]
    async fn reports_rows_added_by_this_bill() {
        let dir = TempDir::new().expect("temp dir");
        let sessions = SessionStore::new();
        let (store, submit) = use_case(&dir, &sessions);

        ready_session(&sessions, "first", 1).await;
        submit.execute_at("first", timestamp()).await.expect("submits");

        ready_session(&sessions, "second", 3).await;
        let output = submit.execute_at("second", timestamp()).await.expect("submits");

        assert_eq!(output.stored_rows, 3);
        assert_eq!(store.load_all().await.expect("loads").len(), 4);
    }

    #[tokio::test]
    async fn concurrent_submits_store_the_bill_once() {
        let dir = TempDir::new().expect("temp dir");
        let sessions = SessionStore::new();
        let (store, submit) = use_case(&dir, &sessions);
        ready_session(&sessions, "double", 2).await;

        let (first, second) = tokio::join!(
            submit.execute_at("double", timestamp()),
            submit.execute_at("double", timestamp())
        );

        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let rejected = first.err().or(second.err()).expect("one submit rejected");
        assert!(matches!(rejected, AppError::WrongStep(_)));
        assert_eq!(store.load_all().await.expect("loads").len(), 2);
        assert_eq!(sessions.snapshot("double").await.step(), WizardStep::SellerInfo);
    }
}
