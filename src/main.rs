//! StudyTrack CLI
//!
//! Terminal companion for the StudyTrack web app:
//! - Run a study countdown and save the session
//! - Show or watch dashboard statistics
//! - Delete a subject
//! - Print a default config file

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studytrack::api::TimerRequest;
use studytrack::config::LoggingConfig;
use studytrack::dashboard::{StatsPatch, StatsView};
use studytrack::format::format_duration;
use studytrack::timer::{confirm_and_save, format_countdown, save_session};
use studytrack::{
    delete_subject, generate_default_config, Config, DecisionGate, DeleteOutcome,
    DashboardPoller, FixedGate, HttpStudyApi, NotificationLevel, Notifier, StudyApi, SubjectRef,
    TickOutcome, TickSource, TimerDriver, TimerMachine, TimerState,
};

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal companion for the StudyTrack study tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// StudyTrack web app URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/studytrack/config.toml, ./studytrack.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a study countdown. Type p to pause, r to resume, s to stop.
    Timer {
        /// Subject id the session is saved under
        #[arg(short, long)]
        subject: String,
        /// Duration in minutes (default from config)
        #[arg(short, long)]
        minutes: Option<i64>,
        /// Save a stopped session without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show dashboard statistics
    Stats {
        /// Keep polling at the configured interval
        #[arg(short, long)]
        watch: bool,
    },

    /// Delete a subject and all its study sessions
    DeleteSubject {
        /// Subject id
        id: String,
        /// Name shown in the confirmation prompt
        #[arg(long)]
        name: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a default config file
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    init_logging(&config.logging);
    tracing::debug!("StudyTrack CLI v{}", env!("CARGO_PKG_VERSION"));

    let api = HttpStudyApi::new(&config.api).context("failed to create HTTP client")?;
    tracing::debug!(base_url = api.base_url(), "Using StudyTrack backend");

    match cli.command {
        Commands::Timer {
            subject,
            minutes,
            yes,
        } => run_timer(&config, &api, subject, minutes, yes).await,
        Commands::Stats { watch } => show_stats(&config, api, watch).await,
        Commands::DeleteSubject { id, name, yes } => remove_subject(&api, id, name, yes).await,
        Commands::Config => Ok(()),
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studytrack={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

// ============ Timer ============

async fn run_timer(
    config: &Config,
    api: &HttpStudyApi,
    subject: String,
    minutes: Option<i64>,
    yes: bool,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticks = TokioTicks::new(tx);
    let current = ticks.generation();

    let mut machine = TimerMachine::new(&config.timer);
    if let Some(minutes) = minutes {
        machine.set_duration(minutes)?;
    }
    machine.select_subject(Some(subject))?;

    let mut driver = TimerDriver::new(machine, ticks);
    let notifier = TerminalNotifier;
    let prompt = TerminalPrompt::new();

    announce_start(api, driver.state()).await;
    driver.start(Utc::now())?;
    eprintln!("Commands: p = pause, r = resume, s = stop (Ctrl-C also stops)");
    render(driver.state());

    loop {
        tokio::select! {
            Some(generation) = rx.recv() => {
                if generation != current.load(Ordering::SeqCst) {
                    continue;
                }
                match driver.tick() {
                    TickOutcome::Counting { .. } => render(driver.state()),
                    TickOutcome::Completed(save) => {
                        render(driver.state());
                        println!("\n🎉 Session complete! Great job, you finished {}.", format_duration(save.duration_minutes));
                        save_session(api, &notifier, None, &save).await;
                        return Ok(());
                    }
                    TickOutcome::Ignored => {}
                }
            }
            line = prompt.next_line() => {
                match line.as_deref().map(str::trim) {
                    Some("p") => {
                        if driver.pause() {
                            println!("\nPaused at {}", format_countdown(driver.state().remaining_seconds));
                        }
                    }
                    Some("r") => {
                        if let Err(e) = driver.start(Utc::now()) {
                            notifier.error(&e.to_string());
                        }
                    }
                    Some("s") | None => break,
                    Some("") => {}
                    Some(other) => eprintln!("Unknown command: {}", other),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let stopped = driver.stop();
    println!("\nStopped after {}", format_duration(stopped.elapsed_minutes));

    let auto = FixedGate(true);
    let gate: &dyn DecisionGate = if yes { &auto } else { &prompt };
    confirm_and_save(api, gate, &notifier, None, &stopped).await;
    Ok(())
}

/// Tell the backend a session began; failures only get logged
async fn announce_start(api: &HttpStudyApi, state: &TimerState) {
    let Some(subject_id) = state.selected_subject.clone() else {
        return;
    };
    let request = TimerRequest {
        subject_id,
        duration: state.total_minutes(),
    };

    match api.start_timer(&request).await {
        Ok(response) if response.success => tracing::debug!("Backend acknowledged timer start"),
        Ok(response) => tracing::warn!(error = ?response.error, "Backend refused timer start"),
        Err(e) => tracing::warn!("Could not announce timer start: {}", e),
    }
}

fn render(state: &TimerState) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "\r⏱  {}  ", format_countdown(state.remaining_seconds));
    let _ = stdout.flush();
}

/// One-second ticks delivered over a channel, tagged so stale ticks can be dropped
struct TokioTicks {
    tx: mpsc::UnboundedSender<u64>,
    generation: Arc<AtomicU64>,
}

impl TokioTicks {
    fn new(tx: mpsc::UnboundedSender<u64>) -> Self {
        Self {
            tx,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn generation(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }
}

/// Aborts the tick task when dropped
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl TickSource for TokioTicks {
    type Handle = AbortOnDrop;

    fn every_second(&mut self) -> AbortOnDrop {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();

        AbortOnDrop(tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }))
    }
}

// ============ Stats ============

async fn show_stats(config: &Config, api: HttpStudyApi, watch: bool) -> anyhow::Result<()> {
    let poller = DashboardPoller::new(api, &config.dashboard);
    let view = TerminalStatsView;

    if !watch {
        match poller.fetch().await? {
            Some(patch) => view.apply(&patch),
            None => anyhow::bail!("Backend refused the statistics request (signed in?)"),
        }
        return Ok(());
    }

    let mut interval = tokio::time::interval(poller.interval());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                poller.poll_once(&view).await;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

struct TerminalStatsView;

impl StatsView for TerminalStatsView {
    fn apply(&self, patch: &StatsPatch) {
        println!("{}", Utc::now().format("%H:%M:%S"));
        println!("  Today:       {}", patch.today);
        println!("  This week:   {}", patch.weekly);
        println!("  Daily goal:  {}", patch.goal);
        if !patch.subjects.is_empty() {
            println!("  Subjects:");
            for subject in &patch.subjects {
                println!(
                    "    {:<24} {:>7}  {}",
                    subject.subject_id, subject.width, subject.label
                );
            }
        }
    }
}

// ============ Subjects ============

async fn remove_subject(
    api: &HttpStudyApi,
    id: String,
    name: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let subject = SubjectRef {
        name: name.unwrap_or_else(|| id.clone()),
        id,
    };
    let notifier = TerminalNotifier;
    let prompt = TerminalPrompt::new();
    let auto = FixedGate(true);
    let gate: &dyn DecisionGate = if yes { &auto } else { &prompt };

    match delete_subject(api, gate, &notifier, &subject, || {}).await {
        DeleteOutcome::Failed => anyhow::bail!("Subject {} was not deleted", subject.id),
        DeleteOutcome::Deleted | DeleteOutcome::Declined => Ok(()),
    }
}

// ============ Terminal seams ============

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        let icon = match level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✕",
        };
        eprintln!("{} {}", icon, message);
    }
}

/// Line-oriented stdin shared by command input and confirmations
struct TerminalPrompt {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalPrompt {
    fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next input line; `None` at end of input
    async fn next_line(&self) -> Option<String> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                None
            }
        }
    }
}

#[async_trait(?Send)]
impl DecisionGate for TerminalPrompt {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();

        matches!(
            self.next_line().await.as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes")
        )
    }
}
