// Copyright (c) 2025 Painel Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("period")
            .long("period")
            .default_value("6months")
            .help("Period preset: 3months|6months|12months|3d|7d|15d|1m|custom"),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .help("Custom period start (YYYY-MM-DD)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("Custom period end (YYYY-MM-DD)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("painel")
        .about("Small-business CRM pipeline, cashflow, tasks, and time-tracking dashboards")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("category")
                .about("Manage income/expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage financial transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("due").long("due").help("Due date (YYYY-MM-DD)"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("pending")
                                .help("pending|paid"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark a transaction paid")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Paid amount; defaults to the full amount"),
                        ),
                ),
        )
        .subcommand(
            Command::new("lead")
                .about("Manage CRM pipeline leads")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("company").long("company"))
                        .arg(Arg::new("source").long("source"))
                        .arg(
                            Arg::new("value")
                                .long("value")
                                .help("Expected deal value"),
                        )
                        .arg(Arg::new("date").long("date").help("Creation date; defaults to today")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("stage").long("stage"))
                        .arg(Arg::new("status").long("status")),
                ))
                .subcommand(
                    Command::new("stage")
                        .about("Move a lead through the pipeline")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("stage")
                                .long("stage")
                                .required(true)
                                .help("new|contacted|proposal|negotiation|won|lost"),
                        ),
                ),
        )
        .subcommand(
            Command::new("task")
                .about("Manage tasks")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .default_value("medium")
                                .help("low|medium|high"),
                        )
                        .arg(Arg::new("due").long("due").help("Due date (YYYY-MM-DD)")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("status").long("status")),
                ))
                .subcommand(
                    Command::new("done").arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("clock")
                .about("Track worked hours")
                .subcommand(
                    Command::new("in")
                        .arg(Arg::new("person").long("person").required(true))
                        .arg(
                            Arg::new("at")
                                .long("at")
                                .help("Clock-in time (YYYY-MM-DD HH:MM); defaults to now"),
                        ),
                )
                .subcommand(
                    Command::new("out")
                        .arg(Arg::new("person").long("person").required(true))
                        .arg(
                            Arg::new("at")
                                .long("at")
                                .help("Clock-out time (YYYY-MM-DD HH:MM); defaults to now"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("month").long("month").help("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Derived metrics over a period")
                .subcommand(json_flags(period_args(
                    Command::new("finance").about("Cashflow, expenses by category, pending totals"),
                )))
                .subcommand(json_flags(period_args(
                    Command::new("crm").about("Pipeline stages, sources, conversion rate"),
                )))
                .subcommand(json_flags(period_args(
                    Command::new("tasks").about("Task status, priorities, overdue"),
                )))
                .subcommand(json_flags(period_args(
                    Command::new("timeclock").about("Worked hours per person"),
                ))),
        )
        .subcommand(
            Command::new("import").about("Import records from CSV").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("leads")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Auto-categorization rules for transaction descriptions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("pattern").long("pattern").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("rewrite")
                                .long("rewrite")
                                .help("Rewrite the description on match"),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(Command::new("doctor").about("Check the database for inconsistencies"))
}
