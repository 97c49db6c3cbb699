//! Watch mode: re-run the unused report of one content file whenever a
//! source file of its project changes.

use std::{
    path::Path,
    sync::{Arc, mpsc},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::super::{args::FileCommand, exit_status::ExitStatus, report};
use super::{
    CommandKind, CommandSummary,
    helper::{finish, open_engine, read_source},
};
use crate::core::{
    Engine,
    cache::SystemClock,
    debounce::{DEFAULT_DELAY, Debouncer},
    workspace::is_source_file,
};

/// How long to block on the watcher when no pass is pending.
const IDLE_WAIT: Duration = Duration::from_secs(60);

const IGNORED_DIRS: &[&str] = &["node_modules", ".git", ".intlayer"];

pub fn watch(cmd: FileCommand) -> Result<ExitStatus> {
    let mut engine = open_engine(&cmd.common)?;
    let (file, _) = read_source(&cmd.file)?;
    let project_root = engine.project_root_for(&file);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to start file watcher")?;
    watcher
        .watch(&project_root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {:?}", project_root))?;

    eprintln!(
        "{} watching {} for changes",
        "[watch]".bold().cyan(),
        project_root.display()
    );

    let mut debouncer = Debouncer::new(DEFAULT_DELAY, Arc::new(SystemClock));
    run_pass(&mut engine, &file, cmd.common.json)?;

    loop {
        let wait = debouncer.time_until_due().unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(Ok(event)) if is_relevant(&event) => {
                debouncer.trigger();
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "watcher error"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => bail!("file watcher disconnected"),
        }

        let Some(generation) = debouncer.poll() else {
            continue;
        };
        engine.clear_caches();
        let result = match read_source(&file) {
            Ok((_, text)) => engine.unused_fields(&file, &text),
            Err(e) => Err(e),
        };

        // Changes that landed while the pass ran supersede it
        while let Ok(Ok(event)) = rx.try_recv() {
            if is_relevant(&event) {
                debouncer.trigger();
            }
        }
        if !debouncer.is_current(generation) {
            tracing::debug!(generation, "discarding superseded pass");
            continue;
        }

        match result {
            Ok(unused) => {
                let result = finish(CommandKind::Unused, CommandSummary::Unused(unused), &engine);
                report::print(&result, cmd.common.json);
            }
            Err(e) => eprintln!("{} {:#}", "error:".bold().red(), e),
        }
    }
}

fn run_pass(engine: &mut Engine, file: &Path, json: bool) -> Result<()> {
    let (_, text) = read_source(file)?;
    let unused = engine.unused_fields(file, &text)?;
    let result = finish(CommandKind::Unused, CommandSummary::Unused(unused), engine);
    report::print(&result, json);
    Ok(())
}

fn is_relevant(event: &Event) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        is_source_file(path)
            && !path.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|name| IGNORED_DIRS.contains(&name))
            })
    })
}
