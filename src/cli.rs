// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .required(required)
        .value_parser(["income", "expense"])
        .help("income or expense")
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD (inclusive)"))
        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"))
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an income or expense")
                .arg(kind_arg(true))
                .arg(Arg::new("category").long("category").short('c').required(true))
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .required(true),
                )
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_flags(range_args(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(kind_arg(false))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        )))
        .subcommand(json_flags(
            Command::new("recent")
                .about("Transactions from the last few days")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_parser(value_parser!(u32))
                        .help("Defaults to the recent_days setting"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("month")
                .about("Transactions in a calendar month")
                .arg(Arg::new("month").long("month").help("YYYY-MM, defaults to this month")),
        ))
        .subcommand(json_flags(
            Command::new("range")
                .about("Transactions between two dates (inclusive)")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true)),
        ))
        .subcommand(
            Command::new("rm")
                .about("Remove a transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("edit")
                .about("Update fields of a transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(kind_arg(false))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(Arg::new("amount").long("amount").short('a'))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("date").long("date")),
        )
}

fn salary_command() -> Command {
    Command::new("salary")
        .about("Base income")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Replace the salary")
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("receipt_date")
                        .long("receipt-date")
                        .help("YYYY-MM-DD, defaults to today"),
                )
                .arg(Arg::new("source").long("source").default_value("Salary")),
        )
        .subcommand(json_flags(Command::new("show").about("Show the salary")))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Derived metrics")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("overview").about("Totals, balance and ratios"),
        ))
        .subcommand(json_flags(
            Command::new("dashboard").about("Overview plus this month and this week"),
        ))
        .subcommand(json_flags(Command::new("month").about("This month's totals")))
        .subcommand(json_flags(Command::new("week").about("This week's totals")))
        .subcommand(json_flags(range_args(
            Command::new("categories").about("Per-category income, expenses and counts"),
        )))
        .subcommand(json_flags(
            Command::new("chart")
                .about("Category breakdown of one kind, largest first")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .value_parser(["income", "expense"])
                        .default_value("expense"),
                )
                .arg(
                    Arg::new("bar")
                        .long("bar")
                        .action(ArgAction::SetTrue)
                        .help("Only the leading categories, bar colors"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("monthly").about("Income and expenses per month"),
        ))
}

fn auth_command() -> Command {
    Command::new("auth")
        .about("Mock sign-in")
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(Arg::new("confirm").long("confirm").required(true)),
        )
        .subcommand(Command::new("logout"))
        .subcommand(
            Command::new("reset-password").arg(Arg::new("email").long("email").required(true)),
        )
        .subcommand(json_flags(Command::new("whoami")))
}

pub fn build_cli() -> Command {
    Command::new("finflow")
        .version(clap::crate_version!())
        .about("Personal income and expense ledger")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(tx_command())
        .subcommand(salary_command())
        .subcommand(report_command())
        .subcommand(
            Command::new("export")
                .about("Write data to a file")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("data")
                .about("Bulk data operations")
                .subcommand_required(true)
                .subcommand(Command::new("demo").about("Replace everything with sample data"))
                .subcommand(Command::new("clear").about("Remove all transactions and salary")),
        )
        .subcommand(auth_command())
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
