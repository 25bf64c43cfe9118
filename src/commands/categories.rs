// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = sub.get_one::<String>("kind").unwrap().to_lowercase();
            if kind != "income" && kind != "expense" {
                return Err(anyhow!("Invalid kind '{}' (use income|expense)", kind));
            }
            conn.execute(
                "INSERT INTO categories(name, kind) VALUES (?1, ?2)",
                params![name, kind],
            )?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT name, kind FROM categories ORDER BY kind, name")?;
            let rows =
                stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
            let mut data = Vec::new();
            for row in rows {
                let (name, kind) = row?;
                data.push(vec![name, kind]);
            }
            println!("{}", pretty_table(&["Category", "Kind"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
