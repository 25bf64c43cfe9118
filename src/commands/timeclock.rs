// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{hours_between, maybe_print_json, parse_datetime, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

const FMT: &str = "%Y-%m-%d %H:%M";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("in", sub)) => clock_in(conn, sub)?,
        Some(("out", sub)) => clock_out(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn at_or_now(sub: &clap::ArgMatches) -> Result<NaiveDateTime> {
    match sub.get_one::<String>("at") {
        Some(s) => parse_datetime(s),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn clock_in(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person = sub.get_one::<String>("person").unwrap();
    let at = at_or_now(sub)?;

    let open: Option<i64> = conn
        .query_row(
            "SELECT id FROM time_entries WHERE person=?1 AND clock_out IS NULL",
            params![person],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = open {
        return Err(anyhow!("'{}' already has open entry {}", person, id));
    }

    conn.execute(
        "INSERT INTO time_entries(person, clock_in) VALUES (?1, ?2)",
        params![person, at.format(FMT).to_string()],
    )?;
    println!("{} clocked in at {}", person, at.format(FMT));
    Ok(())
}

fn clock_out(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person = sub.get_one::<String>("person").unwrap();
    let at = at_or_now(sub)?;

    let (id, clock_in_s): (i64, String) = conn
        .query_row(
            "SELECT id, clock_in FROM time_entries WHERE person=?1 AND clock_out IS NULL
             ORDER BY clock_in DESC LIMIT 1",
            params![person],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| anyhow!("No open entry for '{}'", person))?;

    let clock_in = parse_datetime(&clock_in_s)?;
    if at < clock_in {
        return Err(anyhow!(
            "Clock-out {} precedes clock-in {}",
            at.format(FMT),
            clock_in_s
        ));
    }
    let hours = hours_between(clock_in, at);
    conn.execute(
        "UPDATE time_entries SET clock_out=?1, total_hours=?2 WHERE id=?3",
        params![at.format(FMT).to_string(), hours.to_string(), id],
    )?;
    println!("{} clocked out at {} ({} h)", person, at.format(FMT), hours);
    Ok(())
}

#[derive(Serialize)]
pub struct TimeEntryRow {
    pub id: i64,
    pub person: String,
    pub clock_in: String,
    pub clock_out: String,
    pub total_hours: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from(
        "SELECT id, person, clock_in, clock_out, total_hours FROM time_entries WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(clock_in,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    sql.push_str(" ORDER BY clock_in DESC, id DESC");

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
        data.push(TimeEntryRow {
            id: r.get(0)?,
            person: r.get(1)?,
            clock_in: r.get(2)?,
            clock_out: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            total_hours: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.person.clone(),
                    e.clock_in.clone(),
                    e.clock_out.clone(),
                    e.total_hours.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Person", "In", "Out", "Hours"], rows)
        );
    }
    Ok(())
}
