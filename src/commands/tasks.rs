// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("done", sub)) => done(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let priority = sub.get_one::<String>("priority").unwrap().to_lowercase();
    if !["low", "medium", "high"].contains(&priority.as_str()) {
        return Err(anyhow!(
            "Invalid priority '{}' (use low|medium|high)",
            priority
        ));
    }
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s))
        .transpose()?;
    let today = chrono::Local::now().date_naive();

    conn.execute(
        "INSERT INTO tasks(title, priority, due_date, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            title,
            priority,
            due.map(|d| d.to_string()),
            today.to_string()
        ],
    )?;
    println!("Added task '{}' ({} priority)", title, priority);
    Ok(())
}

fn done(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    conn.execute("UPDATE tasks SET status='done' WHERE id=?1", params![id])?;
    println!("Task {} done", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
    pub created_at: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from(
        "SELECT id, title, status, priority, due_date, created_at FROM tasks WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
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
        data.push(TaskRow {
            id: r.get(0)?,
            title: r.get(1)?,
            status: r.get(2)?,
            priority: r.get(3)?,
            due_date: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
            created_at: r.get(5)?,
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.title.clone(),
                    t.status.clone(),
                    t.priority.clone(),
                    t.due_date.clone(),
                    t.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Title", "Status", "Priority", "Due", "Created"], rows)
        );
    }
    Ok(())
}
