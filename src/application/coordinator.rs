// Chart coordinator - sequences parameter changes into chart updates
//
// One tokio task owns the whole pipeline state. Parameter events arrive on
// an mpsc channel; threshold and point-count edits are debounced to their
// latest value, series selection reloads through the cache. Observers watch
// lifecycle snapshots. A cancellation watch is consulted around every
// suspension, so an effect resolving after teardown is discarded instead of
// applied.
use crate::application::chart_reconciler::ChartReconciler;
use crate::application::chart_renderer::ChartRenderer;
use crate::application::notifier::UserNotifier;
use crate::application::series_cache::SeriesCache;
use crate::application::series_provider::FetchError;
use crate::domain::series::{Parameters, Series, SeriesId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// User-driven parameter changes fed to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterEvent {
    ThresholdChanged(f64),
    /// Raw input value; anything below 1 is dropped when the edit settles.
    PointCountChanged(i64),
    SeriesSelected(SeriesId),
}

/// Pipeline lifecycle as observed from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Published on every lifecycle transition. `inputs_enabled` tells the
/// embedding surface whether threshold/point-count edits are currently
/// accepted; `threshold_step` is the input granularity for the selected
/// series.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSnapshot {
    pub phase: Phase,
    pub series: SeriesId,
    pub error: Option<String>,
    pub inputs_enabled: bool,
    pub threshold_step: f64,
}

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub defaults: Parameters,
    pub population_country: String,
    pub debounce: Duration,
    pub notice_duration: Duration,
}

/// Owner-side handle. Dropping it (or calling `shutdown`) unsubscribes the
/// coordinator from all parameter streams.
pub struct CoordinatorHandle {
    events: mpsc::Sender<ParameterEvent>,
    cancel: watch::Sender<bool>,
    snapshots: watch::Receiver<CoordinatorSnapshot>,
    task: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub fn snapshots(&self) -> watch::Receiver<CoordinatorSnapshot> {
        self.snapshots.clone()
    }

    pub async fn set_threshold(&self, value: f64) {
        let _ = self
            .events
            .send(ParameterEvent::ThresholdChanged(value))
            .await;
    }

    pub async fn set_point_count(&self, value: i64) {
        let _ = self
            .events
            .send(ParameterEvent::PointCountChanged(value))
            .await;
    }

    pub async fn select_series(&self, id: SeriesId) {
        let _ = self.events.send(ParameterEvent::SeriesSelected(id)).await;
    }

    /// Tear the pipeline down. Pending debounce timers never fire and a
    /// fetch resolving after this point is discarded, never applied.
    pub async fn shutdown(self) {
        let _ = self.cancel.send(true);
        drop(self.events);
        let _ = self.task.await;
    }
}

pub struct ChartCoordinator {
    cache: Arc<SeriesCache>,
    renderer: Arc<dyn ChartRenderer>,
    notifier: Arc<dyn UserNotifier>,
    reconciler: ChartReconciler,
    params: Parameters,
    current: Option<Series>,
    phase: Phase,
    error: Option<String>,
    population_country: String,
    debounce: Duration,
    notice_duration: Duration,
    snapshots: watch::Sender<CoordinatorSnapshot>,
}

impl ChartCoordinator {
    /// Wire the pipeline and start its task. The coordinator immediately
    /// leaves Idle and loads the default series.
    pub fn spawn(
        cache: Arc<SeriesCache>,
        renderer: Arc<dyn ChartRenderer>,
        notifier: Arc<dyn UserNotifier>,
        settings: CoordinatorSettings,
    ) -> CoordinatorHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(CoordinatorSnapshot {
            phase: Phase::Idle,
            series: settings.defaults.series,
            error: None,
            inputs_enabled: true,
            threshold_step: settings.defaults.series.threshold_step(),
        });

        let coordinator = ChartCoordinator {
            cache,
            renderer,
            notifier,
            reconciler: ChartReconciler::new(),
            params: settings.defaults,
            current: None,
            phase: Phase::Idle,
            error: None,
            population_country: settings.population_country,
            debounce: settings.debounce,
            notice_duration: settings.notice_duration,
            snapshots: snapshot_tx,
        };

        let task = tokio::spawn(coordinator.run(event_rx, cancel_rx));

        CoordinatorHandle {
            events: event_tx,
            cancel: cancel_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut events: mpsc::Receiver<ParameterEvent>,
        mut cancelled: watch::Receiver<bool>,
    ) {
        // Idle -> Loading for the default series, before any input arrives.
        let initial = self.params.series;
        if !self.load_series(initial, &mut cancelled).await {
            return;
        }

        let mut threshold_edit: Option<(f64, Instant)> = None;
        let mut point_edit: Option<(i64, Instant)> = None;

        loop {
            let threshold_deadline = deadline_or_parked(threshold_edit.map(|(_, at)| at));
            let point_deadline = deadline_or_parked(point_edit.map(|(_, at)| at));

            tokio::select! {
                _ = cancelled.changed() => break,
                event = events.recv() => match event {
                    None => break,
                    Some(ParameterEvent::ThresholdChanged(value)) => {
                        threshold_edit = Some((value, Instant::now() + self.debounce));
                    }
                    Some(ParameterEvent::PointCountChanged(value)) => {
                        point_edit = Some((value, Instant::now() + self.debounce));
                    }
                    Some(ParameterEvent::SeriesSelected(id)) => {
                        if !self.load_series(id, &mut cancelled).await {
                            break;
                        }
                    }
                },
                _ = sleep_until(threshold_deadline), if threshold_edit.is_some() => {
                    if let Some((value, _)) = threshold_edit.take() {
                        self.apply_threshold(value);
                    }
                }
                _ = sleep_until(point_deadline), if point_edit.is_some() => {
                    if let Some((value, _)) = point_edit.take() {
                        self.apply_point_count(value);
                    }
                }
            }
        }
    }

    /// Drive one Loading transition for `id`. Returns false when the
    /// coordinator was torn down while the fetch was outstanding; the
    /// fetch itself still settles the cache in the background.
    async fn load_series(&mut self, id: SeriesId, cancelled: &mut watch::Receiver<bool>) -> bool {
        self.params.series = id;
        // Selecting a series is the only path out of an error state.
        self.error = None;
        self.set_phase(Phase::Loading);

        let fetched = tokio::select! {
            _ = cancelled.changed() => return false,
            result = self.cache.get(id) => result,
        };

        match fetched {
            Ok(series) => {
                tracing::info!("{} series loaded ({} points)", id, series.len());
                self.current = Some(series);
                self.render();
                self.set_phase(Phase::Ready);
            }
            Err(err) => {
                match &err {
                    FetchError::Transport(msg) => {
                        tracing::error!("{} series fetch failed: {}", id, msg)
                    }
                    FetchError::Parse(msg) => {
                        tracing::warn!("{} series response malformed: {}", id, msg)
                    }
                }
                self.error = Some(err.to_string());
                self.notifier
                    .notify(&format!("Error loading {id} data"), self.notice_duration);
                self.set_phase(Phase::Error);
            }
        }
        true
    }

    /// A settled threshold edit. Inert while an error is present or no
    /// chart is on screen yet.
    fn apply_threshold(&mut self, value: f64) {
        if self.error.is_some() || self.phase != Phase::Ready {
            return;
        }
        self.params.threshold = value;
        self.render();
    }

    /// A settled point-count edit; values below 1 are dropped. Re-derives
    /// the view from the cached full series, no re-fetch.
    fn apply_point_count(&mut self, value: i64) {
        if value < 1 || self.error.is_some() || self.phase != Phase::Ready {
            return;
        }
        self.params.max_points = value as usize;
        self.render();
    }

    fn render(&mut self) {
        let Some(series) = self.current.as_ref() else {
            return;
        };
        let label = match self.params.series {
            SeriesId::Stock => "Close Price".to_string(),
            SeriesId::Population => format!("Total Population ({})", self.population_country),
        };
        let chart = self.reconciler.reconcile(series, &self.params, &label);
        self.renderer.redraw(chart);
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        let _ = self.snapshots.send(self.snapshot());
    }

    fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            phase: self.phase,
            series: self.params.series,
            error: self.error.clone(),
            inputs_enabled: self.error.is_none(),
            threshold_step: self.params.series.threshold_step(),
        }
    }
}

/// An unarmed debounce branch still needs an instant to name; park it far
/// out, guarded off in the select.
fn deadline_or_parked(deadline: Option<Instant>) -> Instant {
    deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(60 * 60))
}
