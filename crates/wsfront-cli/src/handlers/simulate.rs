use crate::console::{Console, use_color};
use crate::scenario::{Action, ReadinessKind, Scenario};
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use wsfront_runtime::{
    Collaborators, Frontend, FrontendConfig, FrontendExit, LifecycleOutcome, MemoryConnector,
    MemoryInstanceSource, MemoryLocalIde, MemoryReadiness, OnceSignal, SupervisorExit,
};
use wsfront_types::TransportError;

#[derive(Debug, Serialize)]
struct Summary {
    kind: &'static str,
    presentation: String,
    lifecycle: String,
    start_calls: usize,
    connections_opened: usize,
    connections_closed: usize,
}

pub fn handle(
    config: FrontendConfig,
    scenario_path: &Path,
    session_id: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let scenario = Scenario::load(scenario_path)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(simulate(config, scenario, session_id, format))
}

async fn simulate(
    config: FrontendConfig,
    scenario: Scenario,
    session_id: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = scenario.initial_session();
    let source = Arc::new(MemoryInstanceSource::new(session.clone()));
    let readiness = Arc::new(MemoryReadiness::new());
    let ide = Arc::new(
        MemoryLocalIde::new(scenario.ide.plan()).with_boot_time(scenario.ide.boot_time()),
    );
    let connector = Arc::new(MemoryConnector::new());
    let console = Console::new(format, format == OutputFormat::Plain && use_color());

    let collaborators = Collaborators {
        info: source.clone(),
        readiness: readiness.clone(),
        ide: ide.clone(),
        connector: connector.clone(),
        renderer: Box::new(console.clone()),
        navigator: Arc::new(console.clone()),
        analytics: Arc::new(console.clone()),
        heartbeat: Arc::new(console.clone()),
    };
    let mut frontend = Frontend::new(config);
    if let Some(id) = session_id {
        frontend = frontend.with_session_id(id);
    }
    let handle = frontend.launch(collaborators, OnceSignal::resolved(()));

    spawn_readiness(&scenario, Arc::clone(&readiness));

    for step in &scenario.timeline {
        tokio::time::sleep(step.after()).await;
        if handle.is_finished() {
            tracing::info!("supervisor exited, remaining timeline skipped");
            break;
        }

        if let Some(phase) = step.phase {
            let instance_id = step
                .instance
                .clone()
                .or_else(|| session.instance_id().map(str::to_string))
                .unwrap_or_else(|| "i-1".to_string());
            session = session.with_instance(instance_id, phase);
            source.publish(session.clone());
        }
        match step.action {
            Some(Action::OpenWebIde) => handle.open_web_ide(),
            Some(Action::Activity) => handle.record_activity(),
            Some(Action::Unload) => handle.unload(),
            None => {}
        }
    }

    tokio::time::sleep(scenario.settle()).await;
    handle.shutdown();
    let exit = handle.join().await?;

    print_summary(
        &console,
        format,
        &exit,
        ide.start_calls(),
        connector.opened(),
        connector.closed(),
    )
}

fn spawn_readiness(scenario: &Scenario, readiness: Arc<MemoryReadiness>) {
    let script = scenario.readiness.clone();
    tokio::spawn(async move {
        tokio::time::sleep(script.after()).await;
        match script.kind {
            ReadinessKind::Never => {}
            ReadinessKind::Fail => {
                let message = script
                    .message
                    .unwrap_or_else(|| "readiness stream disconnected".to_string());
                readiness.fail(TransportError::new(message));
            }
            ReadinessKind::LocalOnly | ReadinessKind::DesktopHandoff => {
                if let Some(resolved) = script.readiness() {
                    readiness.resolve_content();
                    readiness.resolve_ide(resolved);
                }
            }
        }
    });
}

fn describe_presentation(exit: SupervisorExit) -> &'static str {
    match exit {
        SupervisorExit::Inert => "inert",
        SupervisorExit::Reloaded => "reloaded",
        SupervisorExit::Unloaded => "unloaded",
        SupervisorExit::Shutdown => "shutdown",
        SupervisorExit::InputsClosed => "inputs closed",
    }
}

fn describe_lifecycle(outcome: &Option<wsfront_runtime::Result<LifecycleOutcome>>) -> String {
    match outcome {
        None => "pending".to_string(),
        Some(Ok(LifecycleOutcome::Inert)) => "inert".to_string(),
        Some(Ok(LifecycleOutcome::InfoClosed)) => "info stream closed".to_string(),
        Some(Ok(LifecycleOutcome::Skipped)) => "skipped (shutting down)".to_string(),
        Some(Ok(LifecycleOutcome::TornDown { ide_started })) => {
            format!("torn down (ide started: {})", ide_started)
        }
        Some(Ok(LifecycleOutcome::Detached { ide_started })) => {
            format!("detached (ide started: {})", ide_started)
        }
        Some(Err(err)) => format!("failed: {}", err),
    }
}

fn print_summary(
    console: &Console,
    format: OutputFormat,
    exit: &FrontendExit,
    start_calls: usize,
    connections_opened: usize,
    connections_closed: usize,
) -> Result<()> {
    let summary = Summary {
        kind: "summary",
        presentation: describe_presentation(exit.presentation).to_string(),
        lifecycle: describe_lifecycle(&exit.lifecycle),
        start_calls,
        connections_opened,
        connections_closed,
    };

    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&summary)?;
            if let Some(map) = value.as_object_mut() {
                map.insert("at_ms".to_string(), serde_json::json!(console.elapsed_ms()));
            }
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Plain => {
            println!();
            println!("presentation: {}", summary.presentation);
            println!("ide task:     {}", summary.lifecycle);
            println!(
                "ide starts:   {}  connections: {} opened, {} closed",
                summary.start_calls, summary.connections_opened, summary.connections_closed
            );
        }
    }
    Ok(())
}
