use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed and found what it looked for
/// - `Failure` (1): Lookup found nothing, or the unused report has findings
/// - `Error` (2): Command failed (missing workspace, unreadable file, bad config)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
