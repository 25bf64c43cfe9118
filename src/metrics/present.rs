// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::metrics::aggregate::{MetricBucket, MonthlyFlow};

/// Fixed chart palette; buckets take colors by `index % len`.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#22c55e", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#ec4899", "#64748b",
];

pub const MONTHS_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

pub fn color_at(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Row shaped for direct consumption by a pie/bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
    pub fill: String,
}

pub fn series_by_sum(buckets: &[MetricBucket]) -> Vec<ChartPoint> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| ChartPoint {
            name: b.label.clone(),
            value: b.sum.to_f64().unwrap_or(0.0),
            fill: color_at(i).to_string(),
        })
        .collect()
}

pub fn series_by_count(buckets: &[MetricBucket]) -> Vec<ChartPoint> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| ChartPoint {
            name: b.label.clone(),
            value: b.count as f64,
            fill: color_at(i).to_string(),
        })
        .collect()
}

/// "jan/2024"-style label.
pub fn month_label(date: NaiveDate) -> String {
    format!("{}/{}", MONTHS_PT[date.month0() as usize], date.year())
}

/// Row shaped for the monthly cashflow chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashflowPoint {
    pub month: String,
    pub receitas: Decimal,
    pub despesas: Decimal,
    pub saldo: Decimal,
}

pub fn cashflow_series(flows: &[MonthlyFlow]) -> Vec<CashflowPoint> {
    flows
        .iter()
        .map(|f| CashflowPoint {
            month: month_label(f.month),
            receitas: f.income,
            despesas: f.expense,
            saldo: f.net(),
        })
        .collect()
}

/// pt-BR / BRL currency string: `R$ 1.234,56`, leading minus for negatives.
pub fn fmt_brl(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let int_grouped: String = grouped.chars().rev().collect();
    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, int_grouped, frac_part)
}

/// Inverse of [`fmt_brl`]: strips the currency marker and grouping dots and
/// reads the comma as decimal separator.
pub fn parse_brl(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '-')
        .collect();
    cleaned
        .replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid BRL amount '{}'", s))
}
