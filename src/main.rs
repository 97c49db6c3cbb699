use std::process::ExitCode;

use clap::Parser;
use dictscope::cli::{Arguments, Command, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();
    dictscope::logging::init_logging(args.verbose());

    if matches!(args.command, Some(Command::Serve)) {
        if let Err(err) = dictscope::mcp::run_server() {
            eprintln!("Error: {}", err);
            return ExitStatus::Error.into();
        }
        return ExitStatus::Success.into();
    }

    match dictscope::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitStatus::Error.into()
        }
    }
}
