use clap::ValueEnum;
use std::fmt;
use wsfront_types::LocalIdeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Local IDE state held fixed while computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum IdeStateArg {
    Uninitialized,
    Starting,
    Ready,
    Failed,
}

impl From<IdeStateArg> for LocalIdeState {
    fn from(arg: IdeStateArg) -> Self {
        match arg {
            IdeStateArg::Uninitialized => LocalIdeState::Uninitialized,
            IdeStateArg::Starting => LocalIdeState::Starting,
            IdeStateArg::Ready => LocalIdeState::Ready,
            IdeStateArg::Failed => LocalIdeState::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum WorkspaceTypeArg {
    Regular,
    Prebuild,
    Probe,
}

impl From<WorkspaceTypeArg> for wsfront_types::WorkspaceType {
    fn from(arg: WorkspaceTypeArg) -> Self {
        match arg {
            WorkspaceTypeArg::Regular => wsfront_types::WorkspaceType::Regular,
            WorkspaceTypeArg::Prebuild => wsfront_types::WorkspaceType::Prebuild,
            WorkspaceTypeArg::Probe => wsfront_types::WorkspaceType::Probe,
        }
    }
}
