// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use painel::metrics::aggregate::{MetricBucket, MonthlyFlow};
use painel::metrics::present::{self, PALETTE};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn brl_formatting_groups_and_uses_comma() {
    assert_eq!(present::fmt_brl(&dec("1234.56")), "R$ 1.234,56");
    assert_eq!(present::fmt_brl(&dec("1000000")), "R$ 1.000.000,00");
    assert_eq!(present::fmt_brl(&dec("0")), "R$ 0,00");
    assert_eq!(present::fmt_brl(&dec("999.9")), "R$ 999,90");
    assert_eq!(present::fmt_brl(&dec("-42.5")), "-R$ 42,50");
}

#[test]
fn brl_round_trips_through_parse() {
    for raw in ["0", "0.99", "1234.56", "987654.32", "-55.5", "12345678.01"] {
        let value = dec(raw).round_dp(2);
        let formatted = present::fmt_brl(&value);
        let parsed = present::parse_brl(&formatted).unwrap();
        assert_eq!(parsed, value, "round-trip failed for {}", formatted);
    }
}

#[test]
fn palette_cycles_by_index() {
    assert_eq!(present::color_at(0), PALETTE[0]);
    assert_eq!(present::color_at(7), PALETTE[7]);
    assert_eq!(present::color_at(8), PALETTE[0]);
    assert_eq!(present::color_at(9), PALETTE[1]);
}

#[test]
fn series_assign_colors_in_order() {
    let buckets: Vec<MetricBucket> = (0..10)
        .map(|i| MetricBucket {
            label: format!("g{}", i),
            count: i as u64,
            sum: Decimal::from(i),
        })
        .collect();
    let points = present::series_by_sum(&buckets);
    assert_eq!(points.len(), 10);
    assert_eq!(points[0].fill, PALETTE[0]);
    assert_eq!(points[8].fill, PALETTE[0]);
    assert_eq!(points[3].value, 3.0);

    let counts = present::series_by_count(&buckets);
    assert_eq!(counts[9].value, 9.0);
}

#[test]
fn empty_buckets_map_to_empty_series() {
    assert!(present::series_by_sum(&[]).is_empty());
    assert!(present::series_by_count(&[]).is_empty());
    assert!(present::cashflow_series(&[]).is_empty());
}

#[test]
fn month_labels_are_pt_br() {
    assert_eq!(present::month_label(d(2024, 1, 15)), "jan/2024");
    assert_eq!(present::month_label(d(2024, 12, 1)), "dez/2024");
}

#[test]
fn cashflow_series_carries_net_balance() {
    let flows = vec![MonthlyFlow {
        month: d(2024, 3, 1),
        income: dec("150"),
        expense: dec("60"),
    }];
    let series = present::cashflow_series(&flows);
    assert_eq!(series[0].month, "mar/2024");
    assert_eq!(series[0].receitas, dec("150"));
    assert_eq!(series[0].despesas, dec("60"));
    assert_eq!(series[0].saldo, dec("90"));
}
