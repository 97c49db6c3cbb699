//! Listings: every usage of a key, and the reads behind a content field.

use anyhow::Result;

use super::super::args::{PositionCommand, UsagesCommand};
use super::{
    CommandKind, CommandResult, CommandSummary, UsagesSummary,
    helper::{finish, open_engine, read_source},
};

pub fn usages(cmd: UsagesCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let project_root = match &cmd.project {
        Some(project) => engine.absolute(project),
        None => engine.workspace_root().to_path_buf(),
    };
    let usages = engine.find_usages(&project_root, &cmd.key)?;
    let summary = UsagesSummary {
        key: cmd.key,
        project_root,
        usages: usages.as_ref().clone(),
    };
    Ok(finish(CommandKind::Usages, CommandSummary::Usages(summary), &engine))
}

pub fn references(cmd: PositionCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let locations = engine.field_references(&file, &text, cmd.position())?;
    Ok(finish(CommandKind::References, CommandSummary::References(locations), &engine))
}
