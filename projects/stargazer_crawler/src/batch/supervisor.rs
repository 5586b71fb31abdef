//! Sequential task queue: one child crawl per repository.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{error, info, warn};

/// How to launch one single-repository crawl.
#[derive(Debug, Clone)]
pub struct CrawlCommand {
    pub program: PathBuf,
    pub database_path: String,
    /// Environment set on every child on top of the inherited one.
    pub env: Vec<(String, String)>,
}

impl CrawlCommand {
    pub fn new(program: impl Into<PathBuf>, database_path: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            database_path: database_path.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn build(&self, repository: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(repository)
            .arg(&self.database_path)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);
        command
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub repository: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    /// Non-zero exit; `code` is `None` when the child was killed by a signal.
    Failed { code: Option<i32> },
    SpawnFailed { message: String },
}

impl TaskOutcome {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            TaskOutcome::Succeeded
        } else {
            TaskOutcome::Failed {
                code: status.code(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub repository: String,
    pub outcome: TaskOutcome,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<TaskRecord>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskRecord> {
        self.records.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn log_summary(&self) {
        let failed = self.records.len() - self.succeeded();
        info!(
            total = self.records.len(),
            succeeded = self.succeeded(),
            failed,
            "Batch finished"
        );
        for record in self.failures() {
            warn!("{} did not complete: {:?}", record.repository, record.outcome);
        }
    }
}

/// Runs queued crawls one at a time and records how each one ended.
///
/// A failing child never stops the queue.
pub struct Supervisor {
    command: CrawlCommand,
    queue: VecDeque<CrawlTask>,
}

impl Supervisor {
    pub fn new(command: CrawlCommand) -> Self {
        Self {
            command,
            queue: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, repository: impl Into<String>) {
        self.queue.push_back(CrawlTask {
            repository: repository.into(),
        });
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub async fn run(mut self) -> BatchReport {
        let mut report = BatchReport::default();
        let total = self.queue.len();

        while let Some(task) = self.queue.pop_front() {
            info!(
                "Crawling {} ({}/{total})...",
                task.repository,
                report.records.len() + 1
            );
            let record = self.run_task(task).await;
            report.records.push(record);
        }

        report
    }

    async fn run_task(&self, task: CrawlTask) -> TaskRecord {
        let started_at = Utc::now();
        let clock = std::time::Instant::now();

        let outcome = match self.command.build(&task.repository).status().await {
            Ok(status) => TaskOutcome::from_status(status),
            Err(err) => {
                error!(
                    "Could not start {} for {}: {err}",
                    self.command.program.display(),
                    task.repository
                );
                TaskOutcome::SpawnFailed {
                    message: err.to_string(),
                }
            }
        };

        match &outcome {
            TaskOutcome::Succeeded => info!("Crawl of {} succeeded", task.repository),
            TaskOutcome::Failed { code } => {
                warn!("Crawl of {} failed (exit code {code:?})", task.repository)
            }
            TaskOutcome::SpawnFailed { .. } => {}
        }

        TaskRecord {
            repository: task.repository,
            outcome,
            started_at,
            elapsed: clock.elapsed(),
        }
    }
}
