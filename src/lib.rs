pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod store;
pub mod use_cases;
pub mod utils;
pub mod validation;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::config::Config;
use crate::services::receipt::ReceiptRenderer;
use crate::services::sessions::SessionStore;
use crate::store::{CsvRecordStore, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionStore,
    pub renderer: Arc<ReceiptRenderer>,
    pub log_request_body: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            store: Arc::new(CsvRecordStore::new(config.record_store_path.clone())),
            sessions: SessionStore::new(),
            renderer: Arc::new(ReceiptRenderer::new(
                config.company_name.clone(),
                config.receipt_file_prefix.clone(),
                config.receipt_font_path.clone(),
                config.receipt_bold_font_path.clone(),
            )),
            log_request_body: config.log_request_body,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/wizard/:session_id",
            get(handlers::wizard::get_wizard).delete(handlers::wizard::leave),
        )
        .route("/wizard/:session_id/seller", post(handlers::wizard::submit_seller))
        .route(
            "/wizard/:session_id/items",
            post(handlers::wizard::add_item).delete(handlers::wizard::remove_last_item),
        )
        .route(
            "/wizard/:session_id/items/:index",
            put(handlers::wizard::update_item),
        )
        .route("/wizard/:session_id/back", post(handlers::wizard::back))
        .route("/wizard/:session_id/submit", post(handlers::wizard::submit))
        .route("/dashboard", get(handlers::dashboard::summary))
        .route("/dashboard/chart.svg", get(handlers::dashboard::chart))
        .route(
            "/records",
            get(handlers::dashboard::history).delete(handlers::dashboard::clear),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_logger::request_logger_middleware,
        ))
        .with_state(state)
}
