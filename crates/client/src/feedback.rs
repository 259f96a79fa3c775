use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use storage::dto::combined_event::CalculatePointsRequest;
use storage::models::{Discipline, Gender};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::api::AthleticsApi;
use crate::scorecard::SharedApi;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Asks the server whether `performance` is legal for `discipline`.
///
/// Never fails: an unreachable server counts as an invalid performance.
pub async fn validate_performance(
    api: &dyn AthleticsApi,
    discipline: Discipline,
    performance: &str,
) -> bool {
    match api.validate_performance(discipline, performance).await {
        Ok(is_valid) => is_valid,
        Err(e) => {
            warn!(%discipline, error = %e, "Performance validation failed");
            false
        }
    }
}

/// Validity and prospective points for what the judge has typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub sequence: u64,
    pub performance: String,
    pub is_valid: bool,
    pub points: Option<i32>,
}

/// Debounced validation of a performance field while it is being typed.
///
/// Keystrokes arriving within the debounce window are coalesced into one
/// request. Every keystroke takes the next sequence number and a response is
/// published only if no newer keystroke has arrived since; slower, older
/// responses are dropped. Dropping the handle cancels requests in flight.
pub struct LiveFeedback {
    input: mpsc::UnboundedSender<(u64, String)>,
    latest: Arc<AtomicU64>,
    output: watch::Receiver<Option<Feedback>>,
    task: JoinHandle<()>,
}

impl LiveFeedback {
    pub fn spawn(
        api: SharedApi,
        discipline: Discipline,
        gender: Gender,
        debounce: Duration,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = watch::channel(None);
        let latest = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(coalesce(
            Evaluator {
                api,
                discipline,
                gender,
                latest: latest.clone(),
                output: Arc::new(output_tx),
            },
            debounce,
            input_rx,
        ));

        Self {
            input: input_tx,
            latest,
            output: output_rx,
            task,
        }
    }

    pub fn input(&self, performance: impl Into<String>) {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        // Only fails once the worker is gone, at which point nobody is listening.
        let _ = self.input.send((sequence, performance.into()));
    }

    pub fn latest(&self) -> Option<Feedback> {
        self.output.borrow().clone()
    }

    /// Waits for the next published feedback.
    pub async fn changed(&mut self) -> Option<Feedback> {
        self.output.changed().await.ok()?;
        self.output.borrow_and_update().clone()
    }
}

impl Drop for LiveFeedback {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone)]
struct Evaluator {
    api: SharedApi,
    discipline: Discipline,
    gender: Gender,
    latest: Arc<AtomicU64>,
    output: Arc<watch::Sender<Option<Feedback>>>,
}

impl Evaluator {
    async fn evaluate(self, sequence: u64, performance: String) {
        let (is_valid, points) = if performance.trim().is_empty() {
            (false, None)
        } else {
            let is_valid =
                validate_performance(self.api.as_ref(), self.discipline, &performance).await;
            let points = if is_valid {
                self.api
                    .calculate_points(&CalculatePointsRequest {
                        discipline: self.discipline,
                        performance: performance.clone(),
                        gender: self.gender,
                    })
                    .await
                    .ok()
            } else {
                None
            };
            (is_valid, points)
        };

        self.output.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != sequence {
                debug!(sequence, %performance, "Discarding stale feedback");
                return false;
            }
            *current = Some(Feedback {
                sequence,
                performance,
                is_valid,
                points,
            });
            true
        });
    }
}

async fn coalesce(
    evaluator: Evaluator,
    debounce: Duration,
    mut input: mpsc::UnboundedReceiver<(u64, String)>,
) {
    // Owned here so that aborting this task also aborts every request in flight.
    let mut evaluations = JoinSet::new();

    while let Some((mut sequence, mut performance)) = input.recv().await {
        loop {
            match tokio::time::timeout(debounce, input.recv()).await {
                Ok(Some(next)) => (sequence, performance) = next,
                Ok(None) | Err(_) => break,
            }
        }

        while evaluations.try_join_next().is_some() {}
        evaluations.spawn(evaluator.clone().evaluate(sequence, performance));
    }
}
