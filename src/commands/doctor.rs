// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Transactions whose category kind contradicts their own kind
    let mut stmt = conn.prepare(
        "SELECT t.id, t.kind, c.name, c.kind FROM transactions t
         JOIN categories c ON t.category_id=c.id
         WHERE t.kind != c.kind",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let tkind: String = r.get(1)?;
        let cname: String = r.get(2)?;
        let ckind: String = r.get(3)?;
        rows.push(vec![
            "category_kind_mismatch".into(),
            format!("tx {} is {} but '{}' is {}", id, tkind, cname, ckind),
        ]);
    }

    // 2) Closed leads without a close date
    let mut stmt2 = conn.prepare(
        "SELECT id, status FROM leads WHERE status IN ('won','lost') AND closed_at IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let status: String = r.get(1)?;
        rows.push(vec![
            "closed_lead_missing_date".into(),
            format!("lead {} is {} with no closed_at", id, status),
        ]);
    }

    // 3) Clock entries left open for more than a day
    let mut stmt3 = conn.prepare(
        "SELECT id, person, clock_in FROM time_entries
         WHERE clock_out IS NULL AND clock_in < datetime('now', '-1 day')",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let person: String = r.get(1)?;
        let clock_in: String = r.get(2)?;
        rows.push(vec![
            "stale_open_clock_entry".into(),
            format!("entry {} for {} open since {}", id, person, clock_in),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
