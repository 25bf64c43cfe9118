// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use painel::metrics::aggregate::{self, UNCATEGORIZED};
use painel::metrics::period::{self, PeriodSelection};
use rust_decimal::Decimal;

struct Rec {
    date: Option<NaiveDate>,
    amount: Decimal,
    paid: Option<Decimal>,
    status: &'static str,
    category: Option<String>,
    note: &'static str,
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn january_2024() -> period::Period {
    period::resolve(
        PeriodSelection::Custom,
        d(2024, 1, 31),
        Some(d(2024, 1, 1)),
        Some(d(2024, 1, 31)),
    )
}

fn rec(
    date: Option<NaiveDate>,
    amount: &str,
    status: &'static str,
    category: Option<&str>,
) -> Rec {
    Rec {
        date,
        amount: dec(amount),
        paid: None,
        status,
        category: category.map(|s| s.to_string()),
        note: "",
    }
}

fn run(records: &[Rec], include_paid_only: bool) -> Vec<aggregate::MetricBucket> {
    aggregate::aggregate(
        records,
        &january_2024(),
        |r| r.date,
        |r| !include_paid_only || r.status == "paid",
        |r| r.category.clone(),
        |r| aggregate::realized(r.amount, r.paid),
    )
}

#[test]
fn status_filter_keeps_only_paid_records() {
    // records = [{100 paid jan-15}, {50 pending jan-20}], filter = paid
    let records = vec![
        rec(Some(d(2024, 1, 15)), "100", "paid", Some("Vendas")),
        rec(Some(d(2024, 1, 20)), "50", "pending", Some("Vendas")),
    ];
    let buckets = run(&records, true);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].count, 1);
    assert_eq!(buckets[0].sum, dec("100"));
}

#[test]
fn bucket_counts_sum_to_filtered_record_count() {
    let records = vec![
        rec(Some(d(2024, 1, 2)), "10", "paid", Some("A")),
        rec(Some(d(2024, 1, 3)), "20", "paid", Some("B")),
        rec(Some(d(2024, 1, 4)), "30", "paid", Some("A")),
        rec(Some(d(2024, 2, 1)), "99", "paid", Some("A")), // outside period
        rec(None, "99", "paid", Some("A")),                // no date
    ];
    let buckets = run(&records, false);
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    let included = records
        .iter()
        .filter(|r| r.date.is_some_and(|dt| january_2024().contains(dt)))
        .count() as u64;
    assert_eq!(total, included);
    assert_eq!(total, 3);
}

#[test]
fn unrelated_fields_do_not_change_the_result() {
    let mut a = vec![rec(Some(d(2024, 1, 10)), "42", "paid", Some("A"))];
    let mut b = vec![rec(Some(d(2024, 1, 10)), "42", "paid", Some("A"))];
    a[0].note = "first";
    b[0].note = "completely different";
    assert_ne!(a[0].note, b[0].note);
    assert_eq!(run(&a, false), run(&b, false));
}

#[test]
fn missing_category_maps_to_sentinel() {
    let records = vec![rec(Some(d(2024, 1, 10)), "42", "paid", None)];
    let buckets = run(&records, false);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].label, UNCATEGORIZED);
}

#[test]
fn labels_are_not_normalized() {
    let records = vec![
        rec(Some(d(2024, 1, 10)), "10", "paid", Some("Vendas")),
        rec(Some(d(2024, 1, 11)), "20", "paid", Some("vendas ")),
    ];
    let buckets = run(&records, false);
    assert_eq!(buckets.len(), 2);
}

#[test]
fn empty_input_yields_empty_buckets_and_zero_percentages() {
    let buckets = run(&[], false);
    assert!(buckets.is_empty());
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(aggregate::percentage(0, total), 0.0);
}

#[test]
fn percentage_is_zero_on_zero_denominator() {
    assert_eq!(aggregate::percentage(5, 0), 0.0);
    assert_eq!(aggregate::percentage(0, 0), 0.0);
    assert_eq!(aggregate::percentage(1, 4), 25.0);
}

#[test]
fn share_is_zero_on_zero_total() {
    assert_eq!(aggregate::share(dec("10"), Decimal::ZERO), 0.0);
    assert_eq!(aggregate::share(dec("25"), dec("100")), 25.0);
}

#[test]
fn realized_prefers_paid_amount() {
    assert_eq!(aggregate::realized(dec("100"), None), dec("100"));
    assert_eq!(aggregate::realized(dec("100"), Some(dec("80"))), dec("80"));
}

#[test]
fn top_by_sum_orders_descending_and_truncates() {
    let records = vec![
        rec(Some(d(2024, 1, 1)), "10", "paid", Some("C")),
        rec(Some(d(2024, 1, 2)), "30", "paid", Some("A")),
        rec(Some(d(2024, 1, 3)), "20", "paid", Some("B")),
    ];
    let top = aggregate::top_by_sum(run(&records, false), 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].label, "A");
    assert_eq!(top[1].label, "B");
}

#[test]
fn top_by_count_breaks_ties_by_label() {
    let records = vec![
        rec(Some(d(2024, 1, 1)), "1", "paid", Some("B")),
        rec(Some(d(2024, 1, 2)), "1", "paid", Some("A")),
    ];
    let top = aggregate::top_by_count(run(&records, false), 5);
    assert_eq!(top[0].label, "A");
    assert_eq!(top[1].label, "B");
}

#[test]
fn monthly_cashflow_zero_fills_and_splits_flows() {
    let p = period::resolve(PeriodSelection::ThreeMonths, d(2024, 3, 15), None, None);
    let records = vec![
        rec(Some(d(2024, 1, 10)), "100", "paid", None),
        rec(Some(d(2024, 3, 5)), "40", "paid", None),
    ];
    let flows = aggregate::monthly_cashflow(
        &records,
        &p,
        |r| r.date,
        |_| true,
        |r| r.amount,
        |r| r.amount >= dec("100"), // first record income, second expense
    );
    assert_eq!(flows.len(), 3);
    assert_eq!(flows[0].month, d(2024, 1, 1));
    assert_eq!(flows[0].income, dec("100"));
    assert_eq!(flows[0].expense, Decimal::ZERO);
    // February has no records but still gets a bucket
    assert_eq!(flows[1].income, Decimal::ZERO);
    assert_eq!(flows[1].expense, Decimal::ZERO);
    assert_eq!(flows[2].expense, dec("40"));
    assert_eq!(flows[2].net(), dec("-40"));
}
