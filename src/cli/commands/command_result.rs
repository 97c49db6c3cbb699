use std::path::PathBuf;

use serde::Serialize;

use super::super::exit_status::ExitStatus;
use crate::core::{
    DefinitionTarget, HoverInfo, InlinePreview, SourceLocation, UnusedReport,
    data::{Position, ResolutionOrigin, UsageLocation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Resolve,
    Hover,
    Definition,
    Usages,
    References,
    Unused,
    Previews,
    Locate,
}

/// Payload of a finished command, serialized as-is for `--json`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandSummary {
    Resolve(Option<ResolutionOrigin>),
    Hover(Option<HoverInfo>),
    Definition(Vec<DefinitionTarget>),
    Usages(UsagesSummary),
    References(Vec<SourceLocation>),
    Unused(Option<UnusedReport>),
    Previews(Vec<InlinePreview>),
    Locate(Option<Position>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagesSummary {
    pub key: String,
    pub project_root: PathBuf,
    pub usages: Vec<UsageLocation>,
}

/// Result of running a dictscope command
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Paths in text output are shown relative to this directory.
    pub workspace_root: PathBuf,
}

impl CommandResult {
    /// Lookups that find nothing and unused reports with findings exit with
    /// `Failure`; listings always succeed.
    pub fn exit_status(&self) -> ExitStatus {
        let failed = match &self.summary {
            CommandSummary::Resolve(origin) => origin.is_none(),
            CommandSummary::Hover(hover) => hover.is_none(),
            CommandSummary::Definition(targets) => targets.is_empty(),
            CommandSummary::Locate(position) => position.is_none(),
            CommandSummary::Unused(report) => report.as_ref().is_some_and(UnusedReport::has_findings),
            CommandSummary::Usages(_) | CommandSummary::References(_) | CommandSummary::Previews(_) => {
                false
            }
        };
        if failed {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
