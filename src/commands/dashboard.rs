// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::commands::leads::STAGES;
use crate::metrics::aggregate::{self, MetricBucket};
use crate::metrics::period::{self, Period, PeriodSelection};
use crate::metrics::present::{self, CashflowPoint, ChartPoint};
use crate::models::{Category, Lead, Task, TimeEntry, Transaction};
use crate::utils::{hours_between, maybe_print_json, parse_date, parse_datetime, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("finance", sub)) => finance(conn, sub)?,
        Some(("crm", sub)) => crm(conn, sub)?,
        Some(("tasks", sub)) => tasks(conn, sub)?,
        Some(("timeclock", sub)) => timeclock(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_from_args(sub: &clap::ArgMatches) -> Result<Period> {
    let selection: PeriodSelection = sub.get_one::<String>("period").unwrap().parse()?;
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let today = chrono::Local::now().date_naive();
    Ok(period::resolve(selection, today, from, to))
}

fn parse_money(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

// ---- row loaders (the record fetcher side of the pipeline) ----

pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, kind FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, kind, description, category_id, amount, paid_amount, status, due_date
         FROM transactions ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(5)?;
        let paid_s: Option<String> = r.get(6)?;
        let due_s: Option<String> = r.get(8)?;
        data.push(Transaction {
            id: r.get(0)?,
            date: parse_date(&date_s)?,
            kind: r.get(2)?,
            description: r.get(3)?,
            category_id: r.get(4)?,
            amount: parse_money(&amount_s)?,
            paid_amount: paid_s.map(|s| parse_money(&s)).transpose()?,
            status: r.get(7)?,
            due_date: due_s.map(|s| parse_date(&s)).transpose()?,
        });
    }
    Ok(data)
}

pub fn load_leads(conn: &Connection) -> Result<Vec<Lead>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, company, stage, source, expected_value, status, created_at, closed_at
         FROM leads ORDER BY created_at, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let created_s: String = r.get(7)?;
        let closed_s: Option<String> = r.get(8)?;
        let value_s: Option<String> = r.get(5)?;
        data.push(Lead {
            id: r.get(0)?,
            name: r.get(1)?,
            company: r.get(2)?,
            stage: r.get(3)?,
            source: r.get(4)?,
            expected_value: value_s.map(|s| parse_money(&s)).transpose()?,
            status: r.get(6)?,
            created_at: parse_date(&created_s)?,
            closed_at: closed_s.map(|s| parse_date(&s)).transpose()?,
        });
    }
    Ok(data)
}

pub fn load_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn
        .prepare("SELECT id, title, status, priority, due_date, created_at FROM tasks ORDER BY id")?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let due_s: Option<String> = r.get(4)?;
        let created_s: String = r.get(5)?;
        data.push(Task {
            id: r.get(0)?,
            title: r.get(1)?,
            status: r.get(2)?,
            priority: r.get(3)?,
            due_date: due_s.map(|s| parse_date(&s)).transpose()?,
            created_at: parse_date(&created_s)?,
        });
    }
    Ok(data)
}

pub fn load_time_entries(conn: &Connection) -> Result<Vec<TimeEntry>> {
    let mut stmt = conn
        .prepare("SELECT id, person, clock_in, clock_out, total_hours FROM time_entries ORDER BY id")?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let in_s: String = r.get(2)?;
        let out_s: Option<String> = r.get(3)?;
        let hours_s: Option<String> = r.get(4)?;
        data.push(TimeEntry {
            id: r.get(0)?,
            person: r.get(1)?,
            clock_in: parse_datetime(&in_s)?,
            clock_out: out_s.map(|s| parse_datetime(&s)).transpose()?,
            total_hours: hours_s.map(|s| parse_money(&s)).transpose()?,
        });
    }
    Ok(data)
}

// ---- finance ----

#[derive(Serialize)]
pub struct FinanceDashboard {
    pub cashflow: Vec<CashflowPoint>,
    pub top_expenses: Vec<MetricBucket>,
    pub expense_total: Decimal,
    pub expenses_by_category: Vec<ChartPoint>,
    pub a_receber: Decimal,
    pub a_pagar: Decimal,
}

pub fn finance_metrics(
    txs: &[Transaction],
    categories: &[Category],
    p: &Period,
) -> FinanceDashboard {
    // Realized monthly flow: paid records only, paid amount over nominal.
    let flows = aggregate::monthly_cashflow(
        txs,
        p,
        |t| Some(t.date),
        |t| t.status == "paid",
        |t| aggregate::realized(t.amount, t.paid_amount),
        |t| t.kind == "income",
    );

    let names: HashMap<i64, String> = categories
        .iter()
        .map(|c| (c.id, c.name.clone()))
        .collect();
    let expense_buckets = aggregate::aggregate(
        txs,
        p,
        |t| Some(t.date),
        |t| t.kind == "expense",
        |t| t.category_id.and_then(|id| names.get(&id).cloned()),
        |t| aggregate::realized(t.amount, t.paid_amount),
    );
    // Share denominator covers every bucket, not just the displayed top 5.
    let expense_total: Decimal = expense_buckets.iter().map(|b| b.sum).sum();
    let top_expenses = aggregate::top_by_sum(expense_buckets, 5);

    let pending_sum = |kind: &str| -> Decimal {
        txs.iter()
            .filter(|t| p.contains(t.date) && t.kind == kind && t.status == "pending")
            .map(|t| t.amount)
            .sum()
    };

    FinanceDashboard {
        cashflow: present::cashflow_series(&flows),
        expenses_by_category: present::series_by_sum(&top_expenses),
        top_expenses,
        expense_total,
        a_receber: pending_sum("income"),
        a_pagar: pending_sum("expense"),
    }
}

fn finance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = period_from_args(sub)?;
    let txs = load_transactions(conn)?;
    let categories = load_categories(conn)?;
    let dash = finance_metrics(&txs, &categories, &p);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = dash
        .cashflow
        .iter()
        .map(|c| {
            vec![
                c.month.clone(),
                present::fmt_brl(&c.receitas),
                present::fmt_brl(&c.despesas),
                present::fmt_brl(&c.saldo),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Receitas", "Despesas", "Saldo"], rows)
    );

    let rows: Vec<Vec<String>> = dash
        .top_expenses
        .iter()
        .map(|b| {
            vec![
                b.label.clone(),
                present::fmt_brl(&b.sum),
                format!("{:.1}%", aggregate::share(b.sum, dash.expense_total)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Total", "Share"], rows));

    println!("A receber: {}", present::fmt_brl(&dash.a_receber));
    println!("A pagar:   {}", present::fmt_brl(&dash.a_pagar));
    Ok(())
}

// ---- crm ----

#[derive(Serialize)]
pub struct CrmDashboard {
    pub stages: Vec<MetricBucket>,
    pub sources: Vec<ChartPoint>,
    pub conversion_rate: f64,
    pub open_pipeline: Decimal,
}

pub fn crm_metrics(leads: &[Lead], p: &Period) -> CrmDashboard {
    let mut stages = aggregate::aggregate(
        leads,
        p,
        |l| Some(l.created_at),
        |_| true,
        |l| Some(l.stage.clone()),
        |l| l.expected_value.unwrap_or(Decimal::ZERO),
    );
    // Funnel order, not label order.
    stages.sort_by_key(|b| STAGES.iter().position(|s| *s == b.label).unwrap_or(STAGES.len()));

    let source_buckets = aggregate::aggregate(
        leads,
        p,
        |l| Some(l.created_at),
        |_| true,
        |l| l.source.clone(),
        |_| Decimal::ZERO,
    );
    let sources = present::series_by_count(&aggregate::top_by_count(source_buckets, 8));

    let in_period: Vec<&Lead> = leads.iter().filter(|l| p.contains(l.created_at)).collect();
    let total = in_period.len() as u64;
    let won = in_period.iter().filter(|l| l.status == "won").count() as u64;
    let open_pipeline = in_period
        .iter()
        .filter(|l| l.status == "open")
        .map(|l| l.expected_value.unwrap_or(Decimal::ZERO))
        .sum();

    CrmDashboard {
        stages,
        sources,
        conversion_rate: aggregate::percentage(won, total),
        open_pipeline,
    }
}

fn crm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = period_from_args(sub)?;
    let leads = load_leads(conn)?;
    let dash = crm_metrics(&leads, &p);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = dash
        .stages
        .iter()
        .map(|b| {
            vec![
                b.label.clone(),
                b.count.to_string(),
                present::fmt_brl(&b.sum),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Stage", "Leads", "Expected"], rows));

    let rows: Vec<Vec<String>> = dash
        .sources
        .iter()
        .map(|s| vec![s.name.clone(), format!("{:.0}", s.value)])
        .collect();
    println!("{}", pretty_table(&["Source", "Leads"], rows));

    println!("Conversion rate: {:.1}%", dash.conversion_rate);
    println!("Open pipeline:   {}", present::fmt_brl(&dash.open_pipeline));
    Ok(())
}

// ---- tasks ----

pub fn overdue_count(tasks: &[Task], today: NaiveDate) -> u64 {
    tasks
        .iter()
        .filter(|t| t.status != "done" && t.due_date.is_some_and(|d| d < today))
        .count() as u64
}

#[derive(Serialize)]
pub struct TasksDashboard {
    pub by_status: Vec<ChartPoint>,
    pub by_priority: Vec<ChartPoint>,
    pub overdue: u64,
    pub completion_rate: f64,
}

pub fn tasks_metrics(tasks: &[Task], p: &Period, today: NaiveDate) -> TasksDashboard {
    let by_status = aggregate::aggregate(
        tasks,
        p,
        |t| Some(t.created_at),
        |_| true,
        |t| Some(t.status.clone()),
        |_| Decimal::ZERO,
    );
    let by_priority = aggregate::aggregate(
        tasks,
        p,
        |t| Some(t.created_at),
        |_| true,
        |t| Some(t.priority.clone()),
        |_| Decimal::ZERO,
    );
    let in_period: Vec<&Task> = tasks.iter().filter(|t| p.contains(t.created_at)).collect();
    let total = in_period.len() as u64;
    let done = in_period.iter().filter(|t| t.status == "done").count() as u64;

    TasksDashboard {
        by_status: present::series_by_count(&by_status),
        by_priority: present::series_by_count(&by_priority),
        overdue: overdue_count(tasks, today),
        completion_rate: aggregate::percentage(done, total),
    }
}

fn tasks(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = period_from_args(sub)?;
    let records = load_tasks(conn)?;
    let today = chrono::Local::now().date_naive();
    let dash = tasks_metrics(&records, &p, today);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = dash
        .by_status
        .iter()
        .map(|c| vec![c.name.clone(), format!("{:.0}", c.value)])
        .collect();
    println!("{}", pretty_table(&["Status", "Tasks"], rows));

    let rows: Vec<Vec<String>> = dash
        .by_priority
        .iter()
        .map(|c| vec![c.name.clone(), format!("{:.0}", c.value)])
        .collect();
    println!("{}", pretty_table(&["Priority", "Tasks"], rows));

    println!("Overdue:         {}", dash.overdue);
    println!("Completion rate: {:.1}%", dash.completion_rate);
    Ok(())
}

// ---- timeclock ----

#[derive(Serialize)]
pub struct TimeclockDashboard {
    pub by_person: Vec<MetricBucket>,
    pub total_hours: Decimal,
    pub open_entries: u64,
}

pub fn timeclock_metrics(entries: &[TimeEntry], p: &Period) -> TimeclockDashboard {
    let hours_of = |e: &TimeEntry| -> Decimal {
        e.total_hours.unwrap_or_else(|| {
            e.clock_out
                .map(|out| hours_between(e.clock_in, out))
                .unwrap_or(Decimal::ZERO)
        })
    };
    let by_person = aggregate::aggregate(
        entries,
        p,
        |e| Some(e.clock_in.date()),
        |_| true,
        |e| Some(e.person.clone()),
        hours_of,
    );
    let total_hours = by_person.iter().map(|b| b.sum).sum();
    let open_entries = entries
        .iter()
        .filter(|e| p.contains(e.clock_in.date()) && e.clock_out.is_none())
        .count() as u64;

    TimeclockDashboard {
        by_person,
        total_hours,
        open_entries,
    }
}

fn timeclock(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = period_from_args(sub)?;
    let entries = load_time_entries(conn)?;
    let dash = timeclock_metrics(&entries, &p);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = dash
        .by_person
        .iter()
        .map(|b| vec![b.label.clone(), b.count.to_string(), b.sum.to_string()])
        .collect();
    println!("{}", pretty_table(&["Person", "Entries", "Hours"], rows));
    println!("Total hours:  {}", dash.total_hours);
    println!("Open entries: {}", dash.open_entries);
    Ok(())
}
