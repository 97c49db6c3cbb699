use anyhow::Result;

use super::super::args::FileCommand;
use super::{
    CommandKind, CommandResult, CommandSummary,
    helper::{finish, open_engine, read_source},
};

pub fn unused(cmd: FileCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let report = engine.unused_fields(&file, &text)?;
    Ok(finish(CommandKind::Unused, CommandSummary::Unused(report), &engine))
}
