// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use regex::Regex;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::models::Rule;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .with_context(|| format!("Invalid datetime '{}', expected YYYY-MM-DD HH:MM", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

/// Worked hours between clock-in and clock-out, minute precision, 2 dp.
pub fn hours_between(clock_in: NaiveDateTime, clock_out: NaiveDateTime) -> Decimal {
    let minutes = (clock_out - clock_in).num_minutes().max(0);
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

pub fn load_rules(conn: &Connection) -> Result<Vec<Rule>> {
    let mut stmt = conn
        .prepare("SELECT id, pattern, category_id, description_rewrite FROM rules ORDER BY id DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok(Rule {
            id: r.get(0)?,
            pattern: r.get(1)?,
            category_id: r.get(2)?,
            description_rewrite: r.get(3)?,
        })
    })?;
    let mut rules = Vec::new();
    for row in rows {
        rules.push(row?);
    }
    Ok(rules)
}

/// Newest matching rule wins.
pub fn apply_import_rules(
    conn: &Connection,
    description: &str,
) -> Result<(Option<i64>, Option<String>)> {
    for rule in load_rules(conn)? {
        if let Ok(re) = Regex::new(&rule.pattern) {
            if re.is_match(description) {
                return Ok((rule.category_id, rule.description_rewrite));
            }
        }
    }
    Ok((None, None))
}
