use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_COMPANY_NAME: &str = "Công Ty Trách Nhiệm Hữu Hạn Trang Sức Vàng Anh Đào";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub record_store_path: PathBuf,
    pub receipt_font_path: PathBuf,
    pub receipt_bold_font_path: PathBuf,
    pub receipt_file_prefix: String,
    pub company_name: String,
    pub log_request_body: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let receipt_file_prefix = env_or("RECEIPT_FILE_PREFIX", "Bang_ke");
        if receipt_file_prefix.trim().is_empty() {
            anyhow::bail!("RECEIPT_FILE_PREFIX must not be empty");
        }

        Ok(Config {
            server_port: env_or("SERVER_PORT", "3000").parse()?,
            record_store_path: env_or("RECORD_STORE_PATH", "data.csv").into(),
            receipt_font_path: env_or("RECEIPT_FONT_PATH", "arial.ttf").into(),
            receipt_bold_font_path: env_or("RECEIPT_BOLD_FONT_PATH", "arialbd.ttf").into(),
            receipt_file_prefix,
            company_name: env_or("COMPANY_NAME", DEFAULT_COMPANY_NAME),
            log_request_body: env_or("LOG_REQUEST_BODY", "false").parse()?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
