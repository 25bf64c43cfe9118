// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: String, // income | expense
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: String, // income | expense
    pub description: String,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub paid_amount: Option<Decimal>,
    pub status: String, // pending | paid
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub stage: String,
    pub source: Option<String>,
    pub expected_value: Option<Decimal>,
    pub status: String, // open | won | lost
    pub created_at: NaiveDate,
    pub closed_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: String,   // open | doing | done
    pub priority: String, // low | medium | high
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub person: String,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub total_hours: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    pub pattern: String,
    pub category_id: Option<i64>,
    pub description_rewrite: Option<String>,
}
