use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{
        init::init,
        lookup::{definition, hover, locate, previews, resolve},
        unused::unused,
        usages::{references, usages},
        watch::watch,
    },
    exit_status::ExitStatus,
    report,
};

/// Main entry point for the dictscope CLI.
///
/// Dispatches to the command handler, prints its result and maps it onto an
/// exit status. `serve` is handled by the binary before getting here.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    let Some(command) = command else {
        anyhow::bail!("No command provided. Use --help to see available commands.")
    };

    let (result, json) = match command {
        Command::Resolve(cmd) => {
            let json = cmd.common.json;
            (resolve(cmd)?, json)
        }
        Command::Hover(cmd) => {
            let json = cmd.common.json;
            (hover(cmd)?, json)
        }
        Command::Definition(cmd) => {
            let json = cmd.common.json;
            (definition(cmd)?, json)
        }
        Command::Usages(cmd) => {
            let json = cmd.common.json;
            (usages(cmd)?, json)
        }
        Command::References(cmd) => {
            let json = cmd.common.json;
            (references(cmd)?, json)
        }
        Command::Unused(cmd) => {
            let json = cmd.common.json;
            (unused(cmd)?, json)
        }
        Command::Previews(cmd) => {
            let json = cmd.common.json;
            (previews(cmd)?, json)
        }
        Command::Locate(cmd) => {
            let json = cmd.common.json;
            (locate(cmd)?, json)
        }
        Command::Watch(cmd) => return watch(cmd),
        Command::Init => return init(),
        Command::Serve => {
            anyhow::bail!("Serve command should be handled before run()")
        }
    };

    report::print(&result, json);
    Ok(result.exit_status())
}
