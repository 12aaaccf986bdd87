pub mod catalog;
pub mod classify;
pub mod cli;
pub mod convert;
pub mod error;
pub mod guard;
pub mod model;
pub mod path_de;
pub mod schema;
pub mod skeleton;

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.init_tracing();
    match command_line_interface.run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}
