// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// User-facing period preset, as selected on a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelection {
    ThreeMonths,
    SixMonths,
    TwelveMonths,
    ThreeDays,
    SevenDays,
    FifteenDays,
    OneMonth,
    Custom,
}

#[derive(Debug, Error)]
#[error("unknown period '{0}' (expected 3months|6months|12months|3d|7d|15d|1m|custom)")]
pub struct ParsePeriodError(pub String);

impl FromStr for PeriodSelection {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3months" => Ok(Self::ThreeMonths),
            "6months" => Ok(Self::SixMonths),
            "12months" => Ok(Self::TwelveMonths),
            "3d" => Ok(Self::ThreeDays),
            "7d" => Ok(Self::SevenDays),
            "15d" => Ok(Self::FifteenDays),
            "1m" => Ok(Self::OneMonth),
            "custom" => Ok(Self::Custom),
            other => Err(ParsePeriodError(other.to_string())),
        }
    }
}

/// Concrete date interval a preset resolves to. Invariant: `start <= end`,
/// `bucket_count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bucket_count: u32,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Resolve a preset against an explicit `today`.
///
/// Month presets floor to month boundaries: N months back, first of month,
/// through the last day of `today`'s month. Day presets cover the last N
/// days ending at `today`. `custom` defaults the missing ends to
/// start-of-current-month / `today`, and an inverted custom range is
/// swapped so the `Period` invariant holds.
pub fn resolve(
    selection: PeriodSelection,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Period {
    match selection {
        PeriodSelection::ThreeMonths => months_back(today, 3),
        PeriodSelection::SixMonths => months_back(today, 6),
        PeriodSelection::TwelveMonths => months_back(today, 12),
        PeriodSelection::ThreeDays => days_back(today, 3),
        PeriodSelection::SevenDays => days_back(today, 7),
        PeriodSelection::FifteenDays => days_back(today, 15),
        PeriodSelection::OneMonth => {
            let start = today
                .checked_sub_months(Months::new(1))
                .unwrap_or(today);
            let days = (today - start).num_days().max(0) as u32 + 1;
            Period {
                start,
                end: today,
                bucket_count: days,
            }
        }
        PeriodSelection::Custom => {
            let mut start = custom_start.unwrap_or_else(|| first_of_month(today));
            let mut end = custom_end.unwrap_or(today);
            if end < start {
                std::mem::swap(&mut start, &mut end);
            }
            Period {
                start,
                end,
                bucket_count: months_spanned(start, end),
            }
        }
    }
}

fn months_back(today: NaiveDate, n: u32) -> Period {
    let anchor = first_of_month(today);
    let start = anchor
        .checked_sub_months(Months::new(n - 1))
        .unwrap_or(anchor);
    Period {
        start,
        end: last_of_month(today),
        bucket_count: n,
    }
}

fn days_back(today: NaiveDate, n: u32) -> Period {
    let start = today
        .checked_sub_days(Days::new(u64::from(n - 1)))
        .unwrap_or(today);
    Period {
        start,
        end: today,
        bucket_count: n,
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(first)
}

fn months_spanned(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    span.max(0) as u32 + 1
}

/// First day of every calendar month touched by the period, in order.
pub fn month_starts(period: &Period) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut cursor = first_of_month(period.start);
    while cursor <= period.end {
        months.push(cursor);
        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    months
}
