// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    apply_import_rules, id_for_category, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind = sub.get_one::<String>("kind").unwrap().to_lowercase();
    if kind != "income" && kind != "expense" {
        return Err(anyhow!("Invalid kind '{}' (use income|expense)", kind));
    }
    let mut description = sub.get_one::<String>("description").unwrap().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s))
        .transpose()?;
    let status = sub.get_one::<String>("status").unwrap().to_lowercase();
    if status != "pending" && status != "paid" {
        return Err(anyhow!("Invalid status '{}' (use pending|paid)", status));
    }

    let mut category_id = if let Some(cat) = category {
        Some(id_for_category(conn, &cat)?)
    } else {
        None
    };

    // Same rule semantics as the importer: rewrite always applies, the
    // rule category only fills a missing one.
    let (rule_cat, rewrite) = apply_import_rules(conn, &description)?;
    if category_id.is_none() {
        category_id = rule_cat;
    }
    if let Some(new_desc) = rewrite.filter(|new_desc| new_desc != &description) {
        println!("Description rewritten: {} -> {}", description, new_desc);
        description = new_desc;
    }

    let paid_amount = if status == "paid" {
        Some(amount.to_string())
    } else {
        None
    };
    conn.execute(
        "INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            date.to_string(),
            kind,
            description,
            category_id,
            amount.to_string(),
            paid_amount,
            status,
            due.map(|d| d.to_string())
        ],
    )?;
    println!("Recorded {} {} '{}' on {}", kind, amount, description, date);
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let paid = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let nominal: String = conn.query_row(
        "SELECT amount FROM transactions WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    let paid = match paid {
        Some(p) => p.to_string(),
        None => nominal,
    };
    conn.execute(
        "UPDATE transactions SET paid_amount=?1, status='paid' WHERE id=?2",
        params![paid, id],
    )?;
    println!("Transaction {} marked paid ({})", id, paid);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub paid_amount: String,
    pub status: String,
    pub due_date: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.paid_amount.clone(),
                    r.status.clone(),
                    r.due_date.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Description", "Category", "Amount", "Paid", "Status", "Due"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.date, t.kind, t.description, c.name, t.amount, t.paid_amount, t.status, t.due_date
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.into());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND t.status=?");
        params_vec.push(status.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let description: String = r.get(2)?;
        let category: Option<String> = r.get(3)?;
        let amount: String = r.get(4)?;
        let paid_amount: Option<String> = r.get(5)?;
        let status: String = r.get(6)?;
        let due_date: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            date,
            kind,
            description,
            category: category.unwrap_or_default(),
            amount,
            paid_amount: paid_amount.unwrap_or_default(),
            status,
            due_date: due_date.unwrap_or_default(),
        });
    }
    Ok(data)
}
