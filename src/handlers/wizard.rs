use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::domain::bill::decimal_format;
use crate::domain::{GoldType, LineItem, Seller, WizardState, WizardStep, MAX_ITEMS};
use crate::error::AppError;
use crate::use_cases::submit_bill::SubmitBill;
use crate::utils::format::round_half_up;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SellerInput {
    pub name: String,
    pub id_number: String,
    pub address: String,
}

impl From<SellerInput> for Seller {
    fn from(input: SellerInput) -> Self {
        Seller {
            name: input.name,
            id_number: input.id_number,
            address: input.address,
        }
    }
}

/// One line item as entered on the form. The price may be given in VND or,
/// as on the paper form, in thousands of VND.
#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub weight: BigDecimal,
    #[serde(default)]
    pub gold_type: GoldType,
    pub unit_price: Option<u64>,
    pub unit_price_thousand: Option<u64>,
}

impl ItemInput {
    pub fn into_line_item(self) -> Result<LineItem, AppError> {
        let unit_price = match (self.unit_price, self.unit_price_thousand) {
            (Some(price), _) => price,
            (None, Some(thousands)) => thousands.checked_mul(1000).ok_or_else(|| {
                AppError::Validation("unit_price_thousand: is too large".to_string())
            })?,
            (None, None) => {
                return Err(AppError::Validation(
                    "unit_price: one of unit_price or unit_price_thousand is required".to_string(),
                ))
            }
        };

        Ok(LineItem::new(
            round_half_up(&self.weight, 2),
            self.gold_type,
            unit_price,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ItemView {
    #[serde(with = "decimal_format")]
    pub weight: BigDecimal,
    pub gold_type: GoldType,
    pub unit_price: u64,
    #[serde(with = "decimal_format")]
    pub amount: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct WizardView {
    pub session_id: String,
    pub step: WizardStep,
    pub seller: Seller,
    pub items: Vec<ItemView>,
    #[serde(with = "decimal_format")]
    pub total: BigDecimal,
    pub max_items: usize,
    pub gold_types: Vec<&'static str>,
}

impl WizardView {
    fn new(session_id: &str, state: &WizardState) -> Self {
        let items: Vec<ItemView> = state
            .items()
            .iter()
            .map(|item| ItemView {
                weight: item.weight.clone(),
                gold_type: item.gold_type,
                unit_price: item.unit_price,
                amount: item.amount(),
            })
            .collect();
        let total = items
            .iter()
            .fold(BigDecimal::from(0), |sum, item| sum + &item.amount);

        WizardView {
            session_id: session_id.to_string(),
            step: state.step(),
            seller: state.seller().clone(),
            items,
            total,
            max_items: MAX_ITEMS,
            gold_types: GoldType::ALL.iter().map(GoldType::label).collect(),
        }
    }
}

pub async fn get_wizard(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<WizardView> {
    let wizard = state.sessions.snapshot(&session_id).await;
    Json(WizardView::new(&session_id, &wizard))
}

pub async fn submit_seller(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(input): Json<SellerInput>,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .sessions
        .update(&session_id, |wizard| {
            wizard
                .submit_seller(input.into())
                .map(|_| WizardView::new(&session_id, wizard))
        })
        .await?;

    tracing::info!(session_id = %session_id, "Seller info accepted");
    Ok(Json(view))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .sessions
        .update(&session_id, |wizard| {
            wizard
                .add_item()
                .map(|_| WizardView::new(&session_id, wizard))
        })
        .await?;

    Ok(Json(view))
}

pub async fn remove_last_item(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .sessions
        .update(&session_id, |wizard| {
            wizard
                .remove_last_item()
                .map(|_| WizardView::new(&session_id, wizard))
        })
        .await?;

    Ok(Json(view))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
    Json(input): Json<ItemInput>,
) -> Result<Json<WizardView>, AppError> {
    let item = input.into_line_item()?;
    let view = state
        .sessions
        .update(&session_id, |wizard| {
            wizard
                .update_item(index, item)
                .map(|_| WizardView::new(&session_id, wizard))
        })
        .await?;

    Ok(Json(view))
}

pub async fn back(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .sessions
        .update(&session_id, |wizard| {
            wizard.back().map(|_| WizardView::new(&session_id, wizard))
        })
        .await?;

    Ok(Json(view))
}

/// Navigating home drops whatever was entered.
pub async fn leave(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    state.sessions.discard(&session_id).await;
    StatusCode::NO_CONTENT
}

pub async fn submit(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let output = SubmitBill::new(
        state.store.clone(),
        state.sessions.clone(),
        state.renderer.clone(),
    )
    .execute(&session_id)
    .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&output.receipt.file_name),
    );
    if let Ok(total) = HeaderValue::from_str(&output.bill.total().to_string()) {
        headers.insert("x-bill-total", total);
    }
    if let Ok(rows) = HeaderValue::from_str(&output.stored_rows.to_string()) {
        headers.insert("x-stored-rows", rows);
    }

    Ok((StatusCode::OK, headers, output.receipt.bytes))
}

/// Attachment header with an ASCII fallback and the RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|ch| {
            if (ch.is_ascii_graphic() || ch == ' ') && ch != '"' && ch != '\\' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let encoded = url::form_urlencoded::byte_serialize(file_name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
