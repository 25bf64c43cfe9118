// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{apply_import_rules, id_for_category, parse_date, parse_decimal};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use std::collections::{hash_map::Entry, HashMap};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// Columns: date,kind,description,amount,category,status,due_date
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let kind = rec.get(1).context("kind missing")?.trim().to_lowercase();
        let mut description = rec.get(2).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(3).context("amount missing")?.trim().to_string();
        let category = rec.get(4).unwrap_or("").trim().to_string();
        let status_raw = rec.get(5).unwrap_or("").trim().to_lowercase();
        let due_raw = rec.get(6).map(|s| s.trim()).filter(|s| !s.is_empty());

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        if kind != "income" && kind != "expense" {
            return Err(anyhow!("Invalid kind '{}' for {}", kind, description));
        }
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;
        let status = if status_raw.is_empty() {
            "pending".to_string()
        } else if status_raw == "pending" || status_raw == "paid" {
            status_raw
        } else {
            return Err(anyhow!("Invalid status '{}' for {}", status_raw, description));
        };
        let due = due_raw
            .map(|s| parse_date(s).with_context(|| format!("Invalid due date '{}'", s)))
            .transpose()?;

        let mut cat_id = if category.is_empty() {
            None
        } else {
            let cat_id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = id_for_category(&tx, &category)?;
                    *entry.insert(fetched)
                }
            };
            Some(cat_id)
        };

        let (rule_cat, rewrite) = apply_import_rules(&tx, &description)?;
        if cat_id.is_none() {
            cat_id = rule_cat;
        }
        if let Some(new_desc) = rewrite.filter(|new_desc| new_desc != &description) {
            description = new_desc;
        }

        let paid_amount = if status == "paid" {
            Some(amount.to_string())
        } else {
            None
        };
        tx.execute(
            "INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status, due_date) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                date.to_string(),
                kind,
                description,
                cat_id,
                amount.to_string(),
                paid_amount,
                status,
                due.map(|d| d.to_string())
            ],
        )?;
    }
    tx.commit()?;
    println!("Imported transactions from {}", path);
    Ok(())
}
