// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use painel::{cli, commands::leads};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    painel::db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    if let Some(("lead", lead_m)) = matches.subcommand() {
        leads::handle(conn, lead_m)
    } else {
        panic!("lead command not parsed");
    }
}

#[test]
fn lead_add_starts_open_in_new_stage() {
    let conn = setup();
    run(
        &conn,
        &[
            "painel", "lead", "add", "--name", "Acme", "--source", "site",
            "--value", "5000", "--date", "2024-01-05",
        ],
    )
    .unwrap();

    let (stage, status, value, created): (String, String, Option<String>, String) = conn
        .query_row(
            "SELECT stage, status, expected_value, created_at FROM leads LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(stage, "new");
    assert_eq!(status, "open");
    assert_eq!(value, Some("5000".to_string()));
    assert_eq!(created, "2024-01-05");
}

#[test]
fn winning_a_lead_closes_it() {
    let conn = setup();
    run(
        &conn,
        &["painel", "lead", "add", "--name", "Acme", "--date", "2024-01-05"],
    )
    .unwrap();
    run(
        &conn,
        &["painel", "lead", "stage", "--id", "1", "--stage", "won"],
    )
    .unwrap();

    let (stage, status, closed): (String, String, Option<String>) = conn
        .query_row(
            "SELECT stage, status, closed_at FROM leads WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(stage, "won");
    assert_eq!(status, "won");
    assert!(closed.is_some());
}

#[test]
fn reopening_a_lead_clears_the_close_date() {
    let conn = setup();
    run(
        &conn,
        &["painel", "lead", "add", "--name", "Acme", "--date", "2024-01-05"],
    )
    .unwrap();
    run(
        &conn,
        &["painel", "lead", "stage", "--id", "1", "--stage", "lost"],
    )
    .unwrap();
    run(
        &conn,
        &["painel", "lead", "stage", "--id", "1", "--stage", "negotiation"],
    )
    .unwrap();

    let (stage, status, closed): (String, String, Option<String>) = conn
        .query_row(
            "SELECT stage, status, closed_at FROM leads WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(stage, "negotiation");
    assert_eq!(status, "open");
    assert_eq!(closed, None);
}

#[test]
fn invalid_stage_is_rejected() {
    let conn = setup();
    run(
        &conn,
        &["painel", "lead", "add", "--name", "Acme", "--date", "2024-01-05"],
    )
    .unwrap();
    let err = run(
        &conn,
        &["painel", "lead", "stage", "--id", "1", "--stage", "maybe"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid stage"));
}
