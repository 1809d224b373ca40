#![forbid(unsafe_code)]

use clap::{Parser, Subcommand, ValueEnum};
use failsift_github::ActionsClient;
use failsift_notify::{
    offline_runners_from_env, run_url, FailureKind, FailureNotice, Notifier, SlackClient,
};
use failsift_report::{
    collect_errors, extract_warnings, reduce_by_error, reduce_by_model, render_by_error,
    render_by_model, PipelineLog, PipelineStage,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DOWNLOAD_DELAY: Duration = Duration::from_secs(1);
const TOP_ERRORS_SHOWN: usize = 30;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitStatus {
    Success = 0,
    DependencyFailure = 4,
    Internal = 10,
}

enum CliError {
    Dependency(String),
    Internal(String),
}

#[derive(Parser)]
#[command(name = "failsift")]
#[command(about = "CI failure statistics and reporting CLI")]
struct Cli {
    /// Print pipeline stage events as JSON lines after the run.
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a run's artifacts and aggregate its test failures.
    Analyze {
        #[arg(long)]
        workflow_run_id: String,
        /// Where to store the downloaded artifacts and result files.
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,
        /// A token with actions:read permission.
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,
        /// Error messages to drop from both aggregate views.
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Print per-job wall-clock durations, longest first.
    JobTime {
        #[arg(long)]
        workflow_run_id: String,
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,
    },
    /// Download a run's artifacts and collect targeted warnings.
    Warnings {
        #[arg(long)]
        workflow_run_id: String,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "DeprecationWarning,UserWarning,FutureWarning"
        )]
        targets: Vec<String>,
    },
    /// Check that target self-hosted runners are online.
    Runners {
        #[arg(long, value_delimiter = ',')]
        runner_names: Vec<String>,
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,
        /// Where to write the offline-runner listing.
        #[arg(long, default_value = "offline_runners.txt")]
        output: PathBuf,
    },
    /// Post a failure notice to the report channel.
    NotifyFailure {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        ci_title: String,
        #[arg(long, value_enum, default_value_t = FailureKindCli::Other)]
        kind: FailureKindCli,
        #[arg(long)]
        workflow_run_id: String,
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,
        #[arg(long, env = "CI_SLACK_REPORT_CHANNEL_ID")]
        channel: String,
        #[arg(long, env = "SLACK_API_TOKEN")]
        slack_token: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FailureKindCli {
    RunnerNotAvailable,
    RunnerFailed,
    SetupFailed,
    Other,
}

fn main() -> ProcessExitCode {
    init_tracing();
    match run() {
        Ok(()) => ProcessExitCode::from(ExitStatus::Success as u8),
        Err(CliError::Dependency(message)) => {
            eprintln!("{message}");
            ProcessExitCode::from(ExitStatus::DependencyFailure as u8)
        }
        Err(CliError::Internal(message)) => {
            eprintln!("{message}");
            ProcessExitCode::from(ExitStatus::Internal as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            workflow_run_id,
            output_dir,
            repo,
            token,
            exclude,
        } => run_analyze(AnalyzeArgs {
            workflow_run_id,
            output_dir,
            repo,
            token,
            exclude,
            trace: cli.trace,
        }),
        Commands::JobTime {
            workflow_run_id,
            repo,
            token,
        } => run_job_time(&workflow_run_id, &repo, token),
        Commands::Warnings {
            workflow_run_id,
            output_dir,
            repo,
            token,
            targets,
        } => run_warnings(&workflow_run_id, &output_dir, &repo, token, &targets),
        Commands::Runners {
            runner_names,
            repo,
            token,
            output,
        } => run_runners(&runner_names, &repo, token, &output),
        Commands::NotifyFailure {
            title,
            ci_title,
            kind,
            workflow_run_id,
            repo,
            channel,
            slack_token,
        } => run_notify_failure(NotifyFailureArgs {
            title,
            ci_title,
            kind,
            workflow_run_id,
            repo,
            channel,
            slack_token,
        }),
    }
}

struct AnalyzeArgs {
    workflow_run_id: String,
    output_dir: PathBuf,
    repo: String,
    token: Option<String>,
    exclude: Vec<String>,
    trace: bool,
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    fs::create_dir_all(&args.output_dir).map_err(internal)?;
    let client = ActionsClient::new(&args.repo)
        .map_err(internal)?
        .with_token(args.token);
    let mut log = PipelineLog::default();

    log.emit(PipelineStage::Metadata, "analyze.start", BTreeMap::new());
    let job_links = client.job_links(&args.workflow_run_id);
    write_json(&args.output_dir.join("job_links.json"), &job_links)?;

    let artifacts = client.artifact_links(&args.workflow_run_id);
    write_json(&args.output_dir.join("artifacts.json"), &artifacts)?;
    log.emit(
        PipelineStage::Metadata,
        "analyze.metadata.fetched",
        BTreeMap::from([
            ("jobs".to_string(), job_links.len().to_string()),
            ("artifacts".to_string(), artifacts.len().to_string()),
        ]),
    );
    if artifacts.is_empty() {
        return Err(CliError::Dependency(format!(
            "no artifacts found for workflow run {}; nothing to analyze",
            args.workflow_run_id
        )));
    }

    download_all(&client, &artifacts, &args.output_dir, &mut log);

    let records = collect_errors(&args.output_dir, &job_links).map_err(internal)?;
    log.emit(
        PipelineStage::Parse,
        "analyze.errors.collected",
        BTreeMap::from([("records".to_string(), records.len().to_string())]),
    );
    write_json(&args.output_dir.join("errors.json"), &records)?;

    let no_exclusions = BTreeSet::new();
    for group in reduce_by_error(&records, &no_exclusions)
        .iter()
        .take(TOP_ERRORS_SHOWN)
    {
        println!("{}\t{}", group.count, group.message);
    }

    let exclude: BTreeSet<String> = args.exclude.into_iter().collect();
    let by_error = reduce_by_error(&records, &exclude);
    let by_model = reduce_by_model(&records, &exclude);
    log.emit(
        PipelineStage::Reduce,
        "analyze.reduced",
        BTreeMap::from([
            ("error_groups".to_string(), by_error.len().to_string()),
            ("model_groups".to_string(), by_model.len().to_string()),
        ]),
    );

    fs::write(
        args.output_dir.join("reduced_by_error.txt"),
        render_by_error(&by_error),
    )
    .map_err(internal)?;
    fs::write(
        args.output_dir.join("reduced_by_model.txt"),
        render_by_model(&by_model),
    )
    .map_err(internal)?;
    log.emit(PipelineStage::Render, "analyze.tables.written", BTreeMap::new());

    if args.trace {
        print_events(&log)?;
    }
    Ok(())
}

fn download_all(
    client: &ActionsClient,
    artifacts: &BTreeMap<String, String>,
    output_dir: &Path,
    log: &mut PipelineLog,
) {
    for (idx, (name, url)) in artifacts.iter().enumerate() {
        // Be gentle to the hosting API.
        if idx > 0 {
            thread::sleep(DOWNLOAD_DELAY);
        }
        match client.download_artifact(name, url, output_dir) {
            Ok(_) => log.emit(
                PipelineStage::Download,
                "analyze.artifact.downloaded",
                BTreeMap::from([("artifact".to_string(), name.clone())]),
            ),
            Err(err) => {
                tracing::warn!(%err, artifact = name.as_str(), "artifact download failed; skipping");
            }
        }
    }
}

fn run_job_time(run_id: &str, repo: &str, token: Option<String>) -> Result<(), CliError> {
    let client = ActionsClient::new(repo).map_err(internal)?.with_token(token);
    let times = client.job_times(run_id).map_err(internal)?;
    for time in &times {
        println!("{}: {}s", time.name, time.duration_secs);
    }
    Ok(())
}

fn run_warnings(
    run_id: &str,
    output_dir: &Path,
    repo: &str,
    token: Option<String>,
    targets: &[String],
) -> Result<(), CliError> {
    fs::create_dir_all(output_dir).map_err(internal)?;
    let client = ActionsClient::new(repo).map_err(internal)?.with_token(token);
    let artifacts = client.artifact_links(run_id);
    if artifacts.is_empty() {
        return Err(CliError::Dependency(format!(
            "no artifacts found for workflow run {run_id}; nothing to scan"
        )));
    }
    let mut log = PipelineLog::default();
    download_all(&client, &artifacts, output_dir, &mut log);

    let selected = extract_warnings(output_dir, targets).map_err(internal)?;
    write_json(&output_dir.join("selected_warnings.json"), &selected)?;
    println!("selected warnings: {}", selected.len());
    Ok(())
}

fn run_runners(
    runner_names: &[String],
    repo: &str,
    token: Option<String>,
    output: &Path,
) -> Result<(), CliError> {
    let client = ActionsClient::new(repo).map_err(internal)?.with_token(token);
    let offline = client.offline_runners(runner_names).map_err(internal)?;
    write_json(output, &offline)?;
    if offline.is_empty() {
        println!("runner status: OK");
        Ok(())
    } else {
        Err(CliError::Dependency(format!(
            "offline runners detected: {}",
            offline.join(", ")
        )))
    }
}

struct NotifyFailureArgs {
    title: String,
    ci_title: String,
    kind: FailureKindCli,
    workflow_run_id: String,
    repo: String,
    channel: String,
    slack_token: String,
}

fn run_notify_failure(args: NotifyFailureArgs) -> Result<(), CliError> {
    let kind = match args.kind {
        FailureKindCli::RunnerNotAvailable => FailureKind::RunnerNotAvailable,
        FailureKindCli::RunnerFailed => FailureKind::RunnerFailed,
        FailureKindCli::SetupFailed => FailureKind::SetupFailed,
        FailureKindCli::Other => FailureKind::Other,
    };
    let notice = FailureNotice::new(args.title, kind, run_url(&args.repo, &args.workflow_run_id))
        .with_ci_title(args.ci_title)
        .with_offline_runners(offline_runners_from_env());

    let blocks = notice.blocks();
    println!("Sending the following payload");
    println!(
        "{}",
        serde_json::to_string(&serde_json::json!({ "blocks": blocks })).map_err(internal)?
    );

    SlackClient::new(args.slack_token)
        .post(&args.channel, &notice.body_text(), &blocks)
        .map_err(internal)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let body = serde_json::to_string_pretty(value).map_err(internal)?;
    fs::write(path, body).map_err(internal)
}

fn print_events(log: &PipelineLog) -> Result<(), CliError> {
    for event in log.events() {
        println!("{}", serde_json::to_string(event).map_err(internal)?);
    }
    Ok(())
}

fn internal(err: impl std::fmt::Display) -> CliError {
    CliError::Internal(err.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
