//! Read-only views over the record history: daily totals, chart and table.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use crate::domain::bill::{decimal_format, timestamp_format};
use crate::domain::{BillRecord, GoldType};
use crate::utils::format::{format_money, to_whole_units};

pub const CHART_SIZE: (u32, u32) = (960, 480);
const CHART_TITLE: &str = "Tổng Tiền Mua Vàng Hàng Ngày";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    #[serde(with = "decimal_format")]
    pub total: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub bills: usize,
    #[serde(with = "decimal_format")]
    pub grand_total: BigDecimal,
    pub daily_totals: Vec<DailyTotal>,
}

/// History row in display order, which differs from the storage order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    #[serde(rename = "Date", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "SellerName")]
    pub seller_name: String,
    #[serde(rename = "SellerID")]
    pub seller_id: String,
    #[serde(rename = "SellerAddress")]
    pub seller_address: String,
    #[serde(rename = "GoldType")]
    pub gold_type: GoldType,
    #[serde(rename = "Weight(g)", with = "decimal_format")]
    pub weight: BigDecimal,
    #[serde(rename = "UnitPrice")]
    pub unit_price: u64,
    #[serde(rename = "Amount", with = "decimal_format")]
    pub amount: BigDecimal,
}

impl From<BillRecord> for HistoryRow {
    fn from(record: BillRecord) -> Self {
        HistoryRow {
            timestamp: record.timestamp,
            seller_name: record.seller_name,
            seller_id: record.seller_id,
            seller_address: record.seller_address,
            gold_type: record.gold_type,
            weight: record.weight,
            unit_price: record.unit_price,
            amount: record.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum HistoryColumn {
    #[default]
    Date,
    SellerName,
    SellerID,
    SellerAddress,
    GoldType,
    #[serde(rename = "Weight(g)", alias = "Weight")]
    Weight,
    UnitPrice,
    Amount,
}

impl FromStr for HistoryColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Date" => Ok(HistoryColumn::Date),
            "SellerName" => Ok(HistoryColumn::SellerName),
            "SellerID" => Ok(HistoryColumn::SellerID),
            "SellerAddress" => Ok(HistoryColumn::SellerAddress),
            "GoldType" => Ok(HistoryColumn::GoldType),
            "Weight(g)" | "Weight" => Ok(HistoryColumn::Weight),
            "UnitPrice" => Ok(HistoryColumn::UnitPrice),
            "Amount" => Ok(HistoryColumn::Amount),
            other => Err(format!("unknown column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

fn compare(a: &HistoryRow, b: &HistoryRow, column: HistoryColumn) -> Ordering {
    match column {
        HistoryColumn::Date => a.timestamp.cmp(&b.timestamp),
        HistoryColumn::SellerName => a.seller_name.cmp(&b.seller_name),
        HistoryColumn::SellerID => a.seller_id.cmp(&b.seller_id),
        HistoryColumn::SellerAddress => a.seller_address.cmp(&b.seller_address),
        HistoryColumn::GoldType => a.gold_type.label().cmp(b.gold_type.label()),
        HistoryColumn::Weight => a.weight.cmp(&b.weight),
        HistoryColumn::UnitPrice => a.unit_price.cmp(&b.unit_price),
        HistoryColumn::Amount => a.amount.cmp(&b.amount),
    }
}

/// Stable sort, so rows of one bill keep their entry order on ties.
pub fn history(records: Vec<BillRecord>, column: HistoryColumn, order: SortOrder) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = records.into_iter().map(HistoryRow::from).collect();
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    rows
}

pub fn daily_totals(records: &[BillRecord]) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, BigDecimal> = BTreeMap::new();
    for record in records {
        let total = by_date
            .entry(record.timestamp.date())
            .or_insert_with(|| BigDecimal::from(0));
        *total += &record.amount;
    }

    by_date
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

pub fn summarize(records: &[BillRecord]) -> Summary {
    let bills: HashSet<_> = records.iter().map(BillRecord::bill_key).collect();
    let daily_totals = daily_totals(records);
    let grand_total = daily_totals
        .iter()
        .fold(BigDecimal::from(0), |sum, day| sum + &day.total);

    Summary {
        rows: records.len(),
        bills: bills.len(),
        grand_total,
        daily_totals,
    }
}

fn short_amount(value: u64) -> String {
    match value {
        1_000_000_000.. => format!("{:.2} tỷ", value as f64 / 1_000_000_000.0),
        1_000_000..=999_999_999 => format!("{:.1} tr", value as f64 / 1_000_000.0),
        _ => format_money(&BigDecimal::from(value)),
    }
}

/// Bar chart of daily totals as an SVG document.
pub fn render_chart_svg(totals: &[DailyTotal]) -> anyhow::Result<String> {
    let bars: Vec<(String, u64)> = totals
        .iter()
        .map(|day| {
            (
                day.date.format("%Y-%m-%d").to_string(),
                to_whole_units(&day.total).unwrap_or(0),
            )
        })
        .collect();
    let max = bars.iter().map(|(_, total)| *total).max().unwrap_or(0).max(1);
    let y_max = max + max / 10;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0..bars.len().max(1)).into_segmented(), 0u64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Ngày")
            .y_desc("Tổng Tiền (VND)")
            .x_labels(bars.len().clamp(1, 12))
            .x_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => bars
                    .get(*i)
                    .map(|(date, _)| date.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .y_label_formatter(&|y| short_amount(*y))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(RGBColor(212, 160, 23).filled())
                .margin(6)
                .data(bars.iter().enumerate().map(|(i, (_, total))| (i, *total))),
        )?;

        root.present()?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, hour: u32, name: &str, amount: &str) -> BillRecord {
        BillRecord {
            timestamp: NaiveDate::from_ymd_opt(2026, 10, day)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .expect("valid timestamp"),
            seller_name: name.to_string(),
            seller_id: "123456789".to_string(),
            seller_address: "Hanoi".to_string(),
            weight: BigDecimal::from(1),
            gold_type: GoldType::Sjc,
            unit_price: 1,
            amount: BigDecimal::from_str(amount).expect("valid decimal"),
        }
    }

    #[test]
    fn groups_totals_by_calendar_date() {
        let records = vec![
            record(16, 15, "B", "200"),
            record(15, 9, "A", "100.50"),
            record(16, 9, "A", "300"),
        ];

        let totals = daily_totals(&records);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, NaiveDate::from_ymd_opt(2026, 10, 15).expect("date"));
        assert_eq!(totals[0].total, BigDecimal::from_str("100.50").expect("decimal"));
        assert_eq!(totals[1].total, BigDecimal::from(500));
    }

    #[test]
    fn summary_counts_bills_by_timestamp_and_seller() {
        let records = vec![
            record(16, 9, "A", "100"),
            record(16, 9, "A", "50"),
            record(16, 9, "B", "10"),
            record(16, 10, "A", "1"),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.bills, 3);
        assert_eq!(summary.grand_total, BigDecimal::from(161));
    }

    #[test]
    fn history_sorts_by_column_and_order() {
        let records = vec![
            record(16, 9, "B", "200"),
            record(15, 9, "C", "50"),
            record(17, 9, "A", "100"),
        ];

        let by_date = history(records.clone(), HistoryColumn::Date, SortOrder::Asc);
        assert_eq!(by_date[0].seller_name, "C");

        let by_amount = history(records.clone(), HistoryColumn::Amount, SortOrder::Desc);
        let amounts: Vec<_> = by_amount.iter().map(|r| r.amount.to_string()).collect();
        assert_eq!(amounts, vec!["200", "100", "50"]);

        let by_name = history(records, HistoryColumn::SellerName, SortOrder::Asc);
        assert_eq!(by_name[0].seller_name, "A");
    }

    #[test]
    fn history_row_serializes_in_display_order() {
        let row = HistoryRow::from(record(16, 9, "A", "100"));
        let json = serde_json::to_string(&row).expect("serializes");

        let gold = json.find("\"GoldType\"").expect("gold type column");
        let weight = json.find("\"Weight(g)\"").expect("weight column");
        assert!(gold < weight);
        assert!(json.starts_with("{\"Date\":\"2026-10-16 09:00:00\""));
    }

    #[test]
    fn parses_column_names() {
        assert_eq!("Weight(g)".parse(), Ok(HistoryColumn::Weight));
        assert_eq!("Amount".parse(), Ok(HistoryColumn::Amount));
        assert!("Total".parse::<HistoryColumn>().is_err());
    }

    #[test]
    fn renders_chart_for_empty_and_filled_history() {
        let empty = render_chart_svg(&[]).expect("renders empty chart");
        assert!(empty.contains("<svg"));

        let totals = daily_totals(&[record(15, 9, "A", "30000000"), record(16, 9, "B", "12000000")]);
        let svg = render_chart_svg(&totals).expect("renders chart");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
    }
}
