//! rq CLI - run SQL statements and scripts through the retrying query executor

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, debug_sql, exec, query, scalar, script};

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Scalar(args) => scalar::execute(args, &cli.global),
        cli::Commands::Exec(args) => exec::execute(args, &cli.global),
        cli::Commands::Query(args) => query::execute(args, &cli.global),
        cli::Commands::Script(args) => script::execute(args, &cli.global),
        cli::Commands::DebugSql(args) => debug_sql::execute(args),
    }
}
