//! Position and file queries: resolve, hover, definition, previews, locate.

use anyhow::Result;

use super::super::args::{FileCommand, LocateCommand, PositionCommand};
use super::{
    CommandKind, CommandResult, CommandSummary,
    helper::{finish, open_engine, read_source},
};
use crate::core::data::FieldPath;

pub fn resolve(cmd: PositionCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let origin = engine.resolve_origin(&file, &text, cmd.position());
    Ok(finish(CommandKind::Resolve, CommandSummary::Resolve(origin), &engine))
}

pub fn hover(cmd: PositionCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let hover = engine.hover(&file, &text, cmd.position())?;
    Ok(finish(CommandKind::Hover, CommandSummary::Hover(hover), &engine))
}

pub fn definition(cmd: PositionCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let targets = engine.definitions(&file, &text, cmd.position())?;
    Ok(finish(CommandKind::Definition, CommandSummary::Definition(targets), &engine))
}

pub fn previews(cmd: FileCommand) -> Result<CommandResult> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, text) = read_source(&cmd.file)?;
    let previews = engine.inline_previews(&file, &text)?;
    Ok(finish(CommandKind::Previews, CommandSummary::Previews(previews), &engine))
}

pub fn locate(cmd: LocateCommand) -> Result<CommandResult> {
    let engine = open_engine(&cmd.common)?;
    let (file, _) = read_source(&cmd.file)?;
    let position = engine.locate_field(&file, &FieldPath::parse(&cmd.field));
    Ok(finish(CommandKind::Locate, CommandSummary::Locate(position), &engine))
}
