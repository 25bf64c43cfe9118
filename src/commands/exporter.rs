// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("leads", sub)) => export_leads(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.kind, t.description, t.amount, t.paid_amount, t.status, c.name as category, t.due_date
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "kind",
                "description",
                "amount",
                "paid_amount",
                "status",
                "category",
                "due_date",
            ])?;
            for row in rows {
                let (d, k, desc, amt, paid, status, cat, due) = row?;
                wtr.write_record([
                    d,
                    k,
                    desc,
                    amt,
                    paid.unwrap_or_default(),
                    status,
                    cat.unwrap_or_default(),
                    due.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, k, desc, amt, paid, status, cat, due) = row?;
                items.push(json!({
                    "date": d, "kind": k, "description": desc, "amount": amt,
                    "paid_amount": paid, "status": status, "category": cat, "due_date": due
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_leads(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT name, company, stage, source, expected_value, status, created_at, closed_at
         FROM leads ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "name",
                "company",
                "stage",
                "source",
                "expected_value",
                "status",
                "created_at",
                "closed_at",
            ])?;
            for row in rows {
                let (name, company, stage, source, value, status, created, closed) = row?;
                wtr.write_record([
                    name,
                    company.unwrap_or_default(),
                    stage,
                    source.unwrap_or_default(),
                    value.unwrap_or_default(),
                    status,
                    created,
                    closed.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (name, company, stage, source, value, status, created, closed) = row?;
                items.push(json!({
                    "name": name, "company": company, "stage": stage, "source": source,
                    "expected_value": value, "status": status,
                    "created_at": created, "closed_at": closed
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported leads to {}", out);
    Ok(())
}
