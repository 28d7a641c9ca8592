//! Bill and line item entities.
//! A bill is never stored as such: it is persisted as one `BillRecord` per item,
//! and rows of the same bill share timestamp and seller fields.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category labels offered by the shop, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GoldType {
    #[default]
    #[serde(rename = "Vàng SJC")]
    Sjc,
    #[serde(rename = "Vàng 9999")]
    Fine9999,
    #[serde(rename = "Vàng 24K")]
    Karat24,
    #[serde(rename = "Vàng 18K")]
    Karat18,
    #[serde(rename = "Vàng Trắng")]
    White,
}

impl GoldType {
    pub const ALL: [GoldType; 5] = [
        GoldType::Sjc,
        GoldType::Fine9999,
        GoldType::Karat24,
        GoldType::Karat18,
        GoldType::White,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GoldType::Sjc => "Vàng SJC",
            GoldType::Fine9999 => "Vàng 9999",
            GoldType::Karat24 => "Vàng 24K",
            GoldType::Karat18 => "Vàng 18K",
            GoldType::White => "Vàng Trắng",
        }
    }
}

impl fmt::Display for GoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GoldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoldType::ALL
            .into_iter()
            .find(|gold_type| gold_type.label() == s.trim())
            .ok_or_else(|| format!("unknown gold type: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub id_number: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Grams.
    pub weight: BigDecimal,
    pub gold_type: GoldType,
    /// Whole VND per gram.
    pub unit_price: u64,
}

impl LineItem {
    pub fn new(weight: BigDecimal, gold_type: GoldType, unit_price: u64) -> Self {
        Self {
            weight,
            gold_type,
            unit_price,
        }
    }

    pub fn amount(&self) -> BigDecimal {
        &self.weight * BigDecimal::from(self.unit_price)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new(BigDecimal::from(0), GoldType::default(), 0)
    }
}

/// A finalized bill, ready to be persisted and printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub timestamp: NaiveDateTime,
    pub seller: Seller,
    pub items: Vec<LineItem>,
}

impl Bill {
    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::from(0), |total, item| total + item.amount())
    }

    pub fn records(&self) -> Vec<BillRecord> {
        self.items
            .iter()
            .map(|item| BillRecord {
                timestamp: self.timestamp,
                seller_name: self.seller.name.clone(),
                seller_id: self.seller.id_number.clone(),
                seller_address: self.seller.address.clone(),
                weight: item.weight.clone(),
                gold_type: item.gold_type,
                unit_price: item.unit_price,
                amount: item.amount(),
            })
            .collect()
    }
}

/// One persisted row: a line item bound to its bill context.
/// Field order is the storage column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    #[serde(rename = "Date", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "SellerName")]
    pub seller_name: String,
    #[serde(rename = "SellerID")]
    pub seller_id: String,
    #[serde(rename = "SellerAddress")]
    pub seller_address: String,
    #[serde(rename = "Weight(g)", with = "decimal_format")]
    pub weight: BigDecimal,
    #[serde(rename = "GoldType")]
    pub gold_type: GoldType,
    #[serde(rename = "UnitPrice")]
    pub unit_price: u64,
    #[serde(rename = "Amount", with = "decimal_format")]
    pub amount: BigDecimal,
}

impl BillRecord {
    pub const COLUMNS: [&'static str; 8] = [
        "Date",
        "SellerName",
        "SellerID",
        "SellerAddress",
        "Weight(g)",
        "GoldType",
        "UnitPrice",
        "Amount",
    ];

    /// Rows with equal keys belong to the same bill.
    pub fn bill_key(&self) -> (NaiveDateTime, &str, &str, &str) {
        (
            self.timestamp,
            &self.seller_name,
            &self.seller_id,
            &self.seller_address,
        )
    }
}

pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Decimals are kept as their exact text so no float parsing happens on load.
pub mod decimal_format {
    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        BigDecimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
    }
}
