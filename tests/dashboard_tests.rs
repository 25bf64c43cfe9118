// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use painel::commands::dashboard;
use painel::metrics::period::{self, PeriodSelection};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    painel::db::init_schema(&mut conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn jan_feb_2024() -> period::Period {
    period::resolve(
        PeriodSelection::Custom,
        d(2024, 2, 29),
        Some(d(2024, 1, 1)),
        Some(d(2024, 2, 29)),
    )
}

#[test]
fn finance_dashboard_realized_flow_and_pending_totals() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO categories(name, kind) VALUES ('Vendas','income'), ('Aluguel','expense');
        INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status)
            VALUES ('2024-01-10','income','Projeto A', 1, '1000', '900', 'paid');
        INSERT INTO transactions(date, kind, description, category_id, amount, status)
            VALUES ('2024-01-20','income','Projeto B', 1, '500', 'pending');
        INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status)
            VALUES ('2024-02-05','expense','Sala', 2, '300', '300', 'paid');
        INSERT INTO transactions(date, kind, description, amount, status)
            VALUES ('2024-02-15','expense','Taxa', '120', 'pending');
        "#,
    )
    .unwrap();

    let txs = dashboard::load_transactions(&conn).unwrap();
    let categories = dashboard::load_categories(&conn).unwrap();
    let dash = dashboard::finance_metrics(&txs, &categories, &jan_feb_2024());

    assert_eq!(dash.cashflow.len(), 2);
    // Paid amount wins over nominal for realized income
    assert_eq!(dash.cashflow[0].month, "jan/2024");
    assert_eq!(dash.cashflow[0].receitas, dec("900"));
    assert_eq!(dash.cashflow[0].despesas, Decimal::ZERO);
    assert_eq!(dash.cashflow[1].despesas, dec("300"));
    assert_eq!(dash.cashflow[1].saldo, dec("-300"));

    assert_eq!(dash.a_receber, dec("500"));
    assert_eq!(dash.a_pagar, dec("120"));
}

#[test]
fn finance_dashboard_expense_categories_use_sentinel() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO categories(name, kind) VALUES ('Aluguel','expense');
        INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status)
            VALUES ('2024-01-05','expense','Sala', 1, '800', '800', 'paid');
        INSERT INTO transactions(date, kind, description, amount, status)
            VALUES ('2024-01-06','expense','Diversos', '50', 'pending');
        "#,
    )
    .unwrap();

    let txs = dashboard::load_transactions(&conn).unwrap();
    let categories = dashboard::load_categories(&conn).unwrap();
    let dash = dashboard::finance_metrics(&txs, &categories, &jan_feb_2024());

    let names: Vec<&str> = dash
        .expenses_by_category
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Aluguel", "Não definido"]);
    assert_eq!(dash.expenses_by_category[0].value, 800.0);
    assert_eq!(dash.expenses_by_category[0].fill, "#3b82f6");
}

#[test]
fn expense_share_denominator_includes_truncated_categories() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO categories(name, kind) VALUES
            ('C1','expense'), ('C2','expense'), ('C3','expense'),
            ('C4','expense'), ('C5','expense'), ('C6','expense');
        INSERT INTO transactions(date, kind, description, category_id, amount, paid_amount, status)
            VALUES ('2024-01-05','expense','g1', 1, '100', '100', 'paid'),
                   ('2024-01-06','expense','g2', 2, '100', '100', 'paid'),
                   ('2024-01-07','expense','g3', 3, '100', '100', 'paid'),
                   ('2024-01-08','expense','g4', 4, '100', '100', 'paid'),
                   ('2024-01-09','expense','g5', 5, '100', '100', 'paid'),
                   ('2024-01-10','expense','g6', 6, '100', '100', 'paid');
        "#,
    )
    .unwrap();

    let txs = dashboard::load_transactions(&conn).unwrap();
    let categories = dashboard::load_categories(&conn).unwrap();
    let dash = dashboard::finance_metrics(&txs, &categories, &jan_feb_2024());

    // Only five categories are displayed, but the total covers all six
    assert_eq!(dash.top_expenses.len(), 5);
    assert_eq!(dash.expense_total, dec("600"));
    let displayed: Decimal = dash.top_expenses.iter().map(|b| b.sum).sum();
    assert_eq!(displayed, dec("500"));
    assert_eq!(
        painel::metrics::aggregate::share(dash.top_expenses[0].sum, dash.expense_total),
        16.67
    );
}

#[test]
fn crm_dashboard_funnel_order_and_conversion() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO leads(name, stage, source, expected_value, status, created_at)
            VALUES ('L1','new','site','1000','open','2024-01-05');
        INSERT INTO leads(name, stage, source, expected_value, status, created_at, closed_at)
            VALUES ('L2','won','indicacao','2000','won','2024-01-10','2024-02-01');
        INSERT INTO leads(name, stage, source, status, created_at)
            VALUES ('L3','proposal','site','open','2024-02-12');
        INSERT INTO leads(name, stage, status, created_at, closed_at)
            VALUES ('L4','lost','lost','2024-02-20','2024-02-25');
        INSERT INTO leads(name, stage, source, expected_value, status, created_at)
            VALUES ('Old','new','site','9999','open','2023-06-01');
        "#,
    )
    .unwrap();

    let leads = dashboard::load_leads(&conn).unwrap();
    let dash = dashboard::crm_metrics(&leads, &jan_feb_2024());

    let stages: Vec<&str> = dash.stages.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(stages, vec!["new", "proposal", "won", "lost"]);

    // 1 won out of 4 leads created in the period
    assert_eq!(dash.conversion_rate, 25.0);
    assert_eq!(dash.open_pipeline, dec("1000"));

    // Missing source groups under the sentinel
    assert!(dash.sources.iter().any(|s| s.name == "Não definido"));
}

#[test]
fn tasks_dashboard_overdue_and_completion() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO tasks(title, status, priority, due_date, created_at)
            VALUES ('T1','done','high','2024-02-01','2024-01-10');
        INSERT INTO tasks(title, status, priority, due_date, created_at)
            VALUES ('T2','open','medium','2024-02-10','2024-01-15');
        INSERT INTO tasks(title, status, priority, created_at)
            VALUES ('T3','doing','low','2024-02-01');
        "#,
    )
    .unwrap();

    let tasks = dashboard::load_tasks(&conn).unwrap();
    let today = d(2024, 2, 29);
    let dash = dashboard::tasks_metrics(&tasks, &jan_feb_2024(), today);

    assert_eq!(dash.overdue, 1); // T2 past due and not done
    let rate = dash.completion_rate;
    assert!((rate - 100.0 / 3.0).abs() < 1e-9);

    let statuses: Vec<&str> = dash.by_status.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(statuses, vec!["doing", "done", "open"]);
}

#[test]
fn timeclock_dashboard_sums_hours_per_person() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO time_entries(person, clock_in, clock_out, total_hours)
            VALUES ('ana','2024-01-10 08:00','2024-01-10 12:30','4.5');
        INSERT INTO time_entries(person, clock_in, clock_out)
            VALUES ('ana','2024-01-11 13:00','2024-01-11 17:00');
        INSERT INTO time_entries(person, clock_in)
            VALUES ('bruno','2024-02-01 09:00');
        "#,
    )
    .unwrap();

    let entries = dashboard::load_time_entries(&conn).unwrap();
    let dash = dashboard::timeclock_metrics(&entries, &jan_feb_2024());

    let ana = dash.by_person.iter().find(|b| b.label == "ana").unwrap();
    // 4.5 stored + 4.0 derived from the clock pair
    assert_eq!(ana.sum, dec("8.5"));
    assert_eq!(ana.count, 2);
    assert_eq!(dash.total_hours, dec("8.5"));
    assert_eq!(dash.open_entries, 1);
}
