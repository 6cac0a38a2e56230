use crate::PollJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(PollJob);

fn spawn_job<J: SpawnableJob>(job: J, shutdown: &Option<CancellationToken>) -> JoinHandle<()> {
    let job = match shutdown {
        Some(token) => job.with_cancellation(token.clone()),
        None => job,
    };
    Arc::new(job).start_job()
}

pub struct JobRunner {
    poll_jobs: Vec<PollJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            poll_jobs: Vec::new(),
            shutdown: None,
        }
    }

    pub fn with_poll_job(mut self, job: PollJob) -> Self {
        self.poll_jobs.push(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Spawns every job; the handles finish once the shutdown token fires.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!(jobs = self.poll_jobs.len(), "Starting background job runner");

        let handles: Vec<_> = self
            .poll_jobs
            .into_iter()
            .map(|job| spawn_job(job, &self.shutdown))
            .collect();

        info!("All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
