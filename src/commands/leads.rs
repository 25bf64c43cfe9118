// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

/// Pipeline stages in funnel order. Terminal stages also close the lead.
pub const STAGES: [&str; 6] = ["new", "contacted", "proposal", "negotiation", "won", "lost"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("stage", sub)) => stage(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let company = sub.get_one::<String>("company").map(|s| s.to_string());
    let source = sub.get_one::<String>("source").map(|s| s.to_string());
    let value = sub
        .get_one::<String>("value")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let created = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    conn.execute(
        "INSERT INTO leads(name, company, source, expected_value, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            company,
            source,
            value.map(|v| v.to_string()),
            created.to_string()
        ],
    )?;
    println!("Added lead '{}' ({})", name, created);
    Ok(())
}

fn stage(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let stage = sub.get_one::<String>("stage").unwrap().to_lowercase();
    if !STAGES.contains(&stage.as_str()) {
        return Err(anyhow!(
            "Invalid stage '{}' (use {})",
            stage,
            STAGES.join("|")
        ));
    }

    if stage == "won" || stage == "lost" {
        let today = chrono::Local::now().date_naive();
        conn.execute(
            "UPDATE leads SET stage=?1, status=?1, closed_at=?2 WHERE id=?3",
            params![stage, today.to_string(), id],
        )?;
    } else {
        conn.execute(
            "UPDATE leads SET stage=?1, status='open', closed_at=NULL WHERE id=?2",
            params![stage, id],
        )?;
    }
    println!("Lead {} moved to '{}'", id, stage);
    Ok(())
}

#[derive(Serialize)]
pub struct LeadRow {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub stage: String,
    pub source: String,
    pub expected_value: String,
    pub status: String,
    pub created_at: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from(
        "SELECT id, name, company, stage, source, expected_value, status, created_at
         FROM leads WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(stage) = sub.get_one::<String>("stage") {
        sql.push_str(" AND stage=?");
        params_vec.push(stage.into());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND status=?");
        params_vec.push(status.into());
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

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
        data.push(LeadRow {
            id: r.get(0)?,
            name: r.get(1)?,
            company: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            stage: r.get(3)?,
            source: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
            expected_value: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
            status: r.get(6)?,
            created_at: r.get(7)?,
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|l| {
                vec![
                    l.id.to_string(),
                    l.name.clone(),
                    l.company.clone(),
                    l.stage.clone(),
                    l.source.clone(),
                    l.expected_value.clone(),
                    l.status.clone(),
                    l.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Company", "Stage", "Source", "Value", "Status", "Created"],
                rows,
            )
        );
    }
    Ok(())
}
