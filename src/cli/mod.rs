mod args;
mod output;

pub(crate) use args::{CliArgs, Command, parse_cli};
pub(crate) use output::print_report;
