//! Console stand-ins for the page, analytics and heartbeat delivery.
//!
//! Every effect is printed as it happens, either as a colored plain line or
//! as one JSON object per line.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use tokio::time::Instant;
use wsfront_runtime::{AnalyticsSink, HeartbeatSink, Navigator, SurfaceRenderer};
use wsfront_types::{AnalyticsEvent, DesktopHandoff, Surface};

use crate::types::OutputFormat;

/// Colors only for an interactive stdout, and never with `NO_COLOR` set.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// One printed effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Concealed,
    Title {
        title: String,
    },
    Failure {
        message: Option<String>,
    },
    DesktopPanel {
        link: String,
        label: String,
    },
    Swap {
        from: Surface,
        to: Surface,
    },
    Detached {
        keep: Surface,
    },
    OpenExternal {
        link: String,
    },
    Navigate {
        url: String,
    },
    Event {
        event: String,
        phase: Option<String>,
        instance_id: Option<String>,
        error: Option<String>,
    },
    Heartbeat {
        instance_id: String,
        was_closed: bool,
    },
}

impl Effect {
    fn label(&self) -> &'static str {
        match self {
            Effect::Concealed => "page",
            Effect::Title { .. } => "title",
            Effect::Failure { .. } => "failure",
            Effect::DesktopPanel { .. } => "panel",
            Effect::Swap { .. } => "surface",
            Effect::Detached { .. } => "detach",
            Effect::OpenExternal { .. } => "open",
            Effect::Navigate { .. } => "navigate",
            Effect::Event { .. } => "event",
            Effect::Heartbeat { .. } => "heartbeat",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Concealed => write!(f, "concealed"),
            Effect::Title { title } => write!(f, "{:?}", title),
            Effect::Failure { message: Some(m) } => write!(f, "{}", m),
            Effect::Failure { message: None } => write!(f, "(cleared)"),
            Effect::DesktopPanel { link, label } => write!(f, "{} [{}]", link, label),
            Effect::Swap { from, to } => write!(f, "{} -> {}", from, to),
            Effect::Detached { keep } => write!(f, "outside {}", keep),
            Effect::OpenExternal { link } => write!(f, "{}", link),
            Effect::Navigate { url } => write!(f, "{}", url),
            Effect::Event {
                event,
                phase,
                instance_id,
                error,
            } => {
                write!(f, "{} {}", event, phase.as_deref().unwrap_or("-"))?;
                if let Some(id) = instance_id {
                    write!(f, " instance={}", id)?;
                }
                if let Some(err) = error {
                    write!(f, " error={:?}", err)?;
                }
                Ok(())
            }
            Effect::Heartbeat {
                instance_id,
                was_closed,
            } => {
                write!(f, "{}", instance_id)?;
                if *was_closed {
                    write!(f, " (closed)")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    at_ms: u64,
    #[serde(flatten)]
    effect: &'a Effect,
}

/// Prints effects with the elapsed time since the console was created.
#[derive(Debug, Clone)]
pub struct Console {
    format: OutputFormat,
    color: bool,
    started: Instant,
}

impl Console {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self {
            format,
            color,
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn print(&self, effect: Effect) {
        let at_ms = self.elapsed_ms();
        let line = match self.format {
            OutputFormat::Json => match serde_json::to_string(&JsonLine {
                at_ms,
                effect: &effect,
            }) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to serialize effect");
                    return;
                }
            },
            OutputFormat::Plain => self.plain(at_ms, &effect),
        };

        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
    }

    fn plain(&self, at_ms: u64, effect: &Effect) -> String {
        let time = format!("[{:>6}ms]", at_ms);
        let label = format!("{:<9}", effect.label());
        if !self.color {
            return format!("{} {} {}", time, label, effect);
        }

        let label = match effect {
            Effect::Swap { .. } => label.cyan().bold().to_string(),
            Effect::Failure { .. } => label.red().bold().to_string(),
            Effect::Event { .. } => label.green().to_string(),
            Effect::Heartbeat { .. } => label.magenta().to_string(),
            Effect::Navigate { .. } | Effect::OpenExternal { .. } => {
                label.yellow().bold().to_string()
            }
            _ => label.bright_black().to_string(),
        };
        format!("{} {} {}", time.dimmed(), label, effect)
    }
}

impl SurfaceRenderer for Console {
    fn conceal_page(&mut self) {
        self.print(Effect::Concealed);
    }

    fn set_title(&mut self, title: &str) {
        self.print(Effect::Title {
            title: title.to_string(),
        });
    }

    fn set_failure(&mut self, message: Option<&str>) {
        self.print(Effect::Failure {
            message: message.map(str::to_string),
        });
    }

    fn create_desktop_panel(&mut self, handoff: &DesktopHandoff) {
        self.print(Effect::DesktopPanel {
            link: handoff.action_link.clone(),
            label: handoff.label().to_string(),
        });
    }

    fn swap(&mut self, from: Surface, to: Surface) {
        self.print(Effect::Swap { from, to });
    }

    fn detach_extraneous(&mut self, keep: Surface) {
        self.print(Effect::Detached { keep });
    }
}

impl Navigator for Console {
    fn open_external(&self, link: &str) {
        self.print(Effect::OpenExternal {
            link: link.to_string(),
        });
    }

    fn reload(&self, url: &str) {
        self.print(Effect::Navigate {
            url: url.to_string(),
        });
    }
}

impl AnalyticsSink for Console {
    fn track_event(&self, event: AnalyticsEvent) {
        self.print(Effect::Event {
            phase: event.phase().map(str::to_string),
            instance_id: event.property("instanceId").map(str::to_string),
            error: event.property("error").map(str::to_string),
            event: event.event,
        });
    }
}

impl HeartbeatSink for Console {
    fn send_heartbeat(&self, instance_id: &str, was_closed: bool) {
        self.print(Effect::Heartbeat {
            instance_id: instance_id.to_string(),
            was_closed,
        });
    }
}
