// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::metrics::period::{self, Period};

/// Group label for records with no category/source set.
pub const UNCATEGORIZED: &str = "Não definido";

/// One aggregation cell: a group with how many records landed in it and
/// what they sum to. `count` and `sum` are derived only from records that
/// passed the period and status filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricBucket {
    pub label: String,
    pub count: u64,
    pub sum: Decimal,
}

/// Filter, group and sum records into buckets.
///
/// A record is included iff `date_of` yields a date inside the period
/// (inclusive on both ends) and `include` accepts it. Records without a
/// date are excluded. A `None` group maps to [`UNCATEGORIZED`]. Labels are
/// grouped byte-exact; no case or whitespace normalization is applied.
/// Buckets come back in label order, so output is deterministic.
pub fn aggregate<R>(
    records: &[R],
    period: &Period,
    date_of: impl Fn(&R) -> Option<NaiveDate>,
    include: impl Fn(&R) -> bool,
    group_of: impl Fn(&R) -> Option<String>,
    value_of: impl Fn(&R) -> Decimal,
) -> Vec<MetricBucket> {
    let mut map: BTreeMap<String, (u64, Decimal)> = BTreeMap::new();
    for rec in records {
        let Some(date) = date_of(rec) else { continue };
        if !period.contains(date) || !include(rec) {
            continue;
        }
        let label = group_of(rec).unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = map.entry(label).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += value_of(rec);
    }
    map.into_iter()
        .map(|(label, (count, sum))| MetricBucket { label, count, sum })
        .collect()
}

/// Paid/confirmed value of a record, falling back to its nominal amount.
pub fn realized(amount: Decimal, paid_amount: Option<Decimal>) -> Decimal {
    paid_amount.unwrap_or(amount)
}

/// `part / total * 100`, defined as 0 when the denominator is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Share of a monetary total, in percent. 0 when the total is zero.
pub fn share(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        (part / total * Decimal::from(100))
            .round_dp(2)
            .to_f64()
            .unwrap_or(0.0)
    }
}

pub fn top_by_sum(mut buckets: Vec<MetricBucket>, n: usize) -> Vec<MetricBucket> {
    buckets.sort_by(|a, b| b.sum.cmp(&a.sum).then_with(|| a.label.cmp(&b.label)));
    buckets.truncate(n);
    buckets
}

pub fn top_by_count(mut buckets: Vec<MetricBucket>, n: usize) -> Vec<MetricBucket> {
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets.truncate(n);
    buckets
}

/// One calendar month of in/out flow. `month` is the first day of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyFlow {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Fold records into zero-filled month buckets covering the whole period,
/// splitting each record's value into income or expense.
pub fn monthly_cashflow<R>(
    records: &[R],
    period: &Period,
    date_of: impl Fn(&R) -> Option<NaiveDate>,
    include: impl Fn(&R) -> bool,
    value_of: impl Fn(&R) -> Decimal,
    is_income: impl Fn(&R) -> bool,
) -> Vec<MonthlyFlow> {
    let mut flows: Vec<MonthlyFlow> = period::month_starts(period)
        .into_iter()
        .map(|month| MonthlyFlow {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();
    for rec in records {
        let Some(date) = date_of(rec) else { continue };
        if !period.contains(date) || !include(rec) {
            continue;
        }
        let key = period::first_of_month(date);
        if let Some(flow) = flows.iter_mut().find(|f| f.month == key) {
            if is_income(rec) {
                flow.income += value_of(rec);
            } else {
                flow.expense += value_of(rec);
            }
        }
    }
    flows
}
