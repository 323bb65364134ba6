//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use conclave_application::{
    NoTurnProgress, RunRoundUseCase, RunTurnError, RunTurnUseCase, TurnProgressNotifier,
    TurnScheduler,
};
use conclave_domain::{AgentProfile, Conversation};
use conclave_infrastructure::{
    BroadcastNotificationSink, ConfigLoader, FanoutNotificationSink, FileConfig,
    InMemoryTranscriptStore, JsonlEventLog, ScriptedResponder,
};
use conclave_presentation::{
    Cli, ConsoleFormatter, ConversationReport, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    info!("Starting conclave");
    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let topic = match cli.topic.clone() {
        Some(t) => t,
        None => bail!("Topic is required. Example: conclave \"Where should we go for lunch?\""),
    };
    if cli.conversations == 0 || cli.rounds == 0 {
        bail!("--conversations and --rounds must both be at least 1");
    }

    let participants = config
        .agents
        .iter()
        .map(|agent| agent.to_profile())
        .collect::<Result<Vec<AgentProfile>, _>>()
        .context("Invalid agent configuration")?;

    // === Dependency Injection ===
    let show_progress =
        !cli.quiet && config.output.show_progress && cli.output != OutputFormat::Json;
    // Bars would interleave with log lines on stderr
    let reporter = (show_progress && cli.verbose == 0).then(|| Arc::new(ProgressReporter::new()));
    let progress: Arc<dyn TurnProgressNotifier> = match &reporter {
        Some(r) => r.clone(),
        None if show_progress => Arc::new(SimpleProgress),
        None => Arc::new(NoTurnProgress),
    };
    let scheduler = TurnScheduler::with_progress(config.scheduler.to_scheduler_config(), progress);

    let broadcast = Arc::new(BroadcastNotificationSink::new(
        config.notifications.channel_capacity,
    ));
    let mut sinks = FanoutNotificationSink::new().with_sink(broadcast.clone());
    if let Some(path) = &config.notifications.event_log {
        match JsonlEventLog::new(path) {
            Some(log) => {
                info!("Writing conversation events to {}", log.path().display());
                sinks = sinks.with_sink(Arc::new(log));
            }
            None => warn!("Event log disabled"),
        }
    }

    let turns = RunTurnUseCase::new(
        scheduler.clone(),
        Arc::new(ScriptedResponder::new(&config.agents)),
        Arc::new(InMemoryTranscriptStore::new()),
        Arc::new(sinks),
    );
    let round = RunRoundUseCase::new(turns);

    let conversations = (1..=cli.conversations)
        .map(|i| {
            Conversation::new(format!("conv-{}", i), topic.as_str(), participants.clone())
                .map(Arc::new)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Live listeners; each logs the events of its own conversation
    let listeners: Vec<_> = conversations
        .iter()
        .map(|conversation| {
            let mut events = broadcast.subscribe(conversation.id());
            let id = conversation.id().clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            debug!(conversation = %id, event_type = event.event_type(), "Event received");
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(conversation = %id, skipped, "Event listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect();

    let rounds = cli.rounds;
    let started = Instant::now();
    let runs = conversations.iter().map(|conversation| {
        let round = &round;
        async move {
            let mut outcomes = Vec::with_capacity(rounds);
            for _ in 0..rounds {
                outcomes.push(round.execute(Arc::clone(conversation)).await?);
            }
            Ok::<_, RunTurnError>(ConversationReport::new(
                conversation,
                outcomes,
            ))
        }
    });
    let reports = futures::future::join_all(runs)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    let elapsed = started.elapsed();

    if let Some(reporter) = &reporter {
        reporter.finish();
    }
    scheduler.shutdown().await;
    for listener in listeners {
        listener.abort();
    }

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&reports),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&reports),
        OutputFormat::Json => ConsoleFormatter::format_json(&reports),
    };
    println!("{}", output);

    if !cli.quiet && cli.output != OutputFormat::Json {
        println!(
            "{} conversation(s) x {} round(s) in {:.2}s",
            reports.len(),
            rounds,
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

/// Initialize logging based on verbosity level, to stderr or `file`
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Could not create log directory {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Log warnings and fail on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
