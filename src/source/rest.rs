//! REST polling telemetry source.
//!
//! On a fixed interval, fetches every domain endpoint concurrently and
//! forwards each successful payload as a [`TelemetryUpdate`]. Individual
//! endpoint failures are logged and dropped; they never fail the tick or
//! delay the other endpoints. A handle controls the schedule (stop, resume,
//! manual refresh) without touching in-flight requests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant as TokioInstant, MissedTickBehavior};
use tracing::{debug, warn};

use super::{Domain, TelemetrySnapshot, TelemetrySource, TelemetryUpdate};

/// Control messages for the polling worker.
#[derive(Debug)]
enum Command {
    /// Run one tick now, regardless of the schedule.
    Tick,
    /// Resume scheduled ticks.
    Start,
    /// Suspend scheduled ticks. In-flight requests still complete and apply.
    Stop,
}

/// Control handle for the polling schedule.
///
/// Cheap to clone; all clones drive the same worker. Commands sent after the
/// worker has shut down are silently dropped.
#[derive(Debug, Clone)]
pub struct PollerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl PollerHandle {
    /// Trigger one tick immediately. Valid whether or not scheduled polling
    /// is running; this is the manual refresh action.
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Tick);
    }

    /// Resume scheduled ticks.
    pub fn start(&self) {
        let _ = self.commands.send(Command::Start);
    }

    /// Suspend scheduled ticks. Does not abort requests already in flight;
    /// their results still apply.
    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }
}

/// A telemetry source that polls the backend's REST endpoints.
///
/// Spawns a background worker that owns the schedule. Each tick issues one
/// GET per domain concurrently with settle-all semantics: the tick never
/// fails as a whole, and every successful payload is forwarded tagged by its
/// domain. Ticks are spawned tasks, so a slow endpoint in one tick does not
/// block commands or the next tick.
#[derive(Debug)]
pub struct RestSource {
    receiver: mpsc::Receiver<TelemetryUpdate>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl RestSource {
    /// Spawn the polling worker. Scheduled polling starts in the running
    /// state; the first tick fires one full interval after spawn (callers
    /// wanting data immediately can `refresh()` the handle).
    pub fn spawn(base_url: &str, poll_interval: Duration) -> (Self, PollerHandle) {
        let client = reqwest::Client::new();
        let base = base_url.trim_end_matches('/').to_string();
        let (update_tx, update_rx) = mpsc::channel(64);
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let description = format!("poll: {}", base);

        tokio::spawn(async move {
            let mut running = true;
            let mut ticker = interval_at(TokioInstant::now() + poll_interval, poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick(), if running => {
                        spawn_tick(&client, &base, &update_tx, &error_handle);
                    }
                    cmd = cmd_rx.recv() => match cmd {
                        Some(Command::Tick) => spawn_tick(&client, &base, &update_tx, &error_handle),
                        Some(Command::Start) => {
                            running = true;
                            ticker.reset();
                        }
                        Some(Command::Stop) => running = false,
                        // All handles dropped: no more ticks can be scheduled.
                        // In-flight ticks hold their own channel clones and
                        // finish on their own.
                        None => break,
                    }
                }
            }
        });

        let source = Self {
            receiver: update_rx,
            description,
            last_error,
        };
        let handle = PollerHandle { commands: cmd_tx };
        (source, handle)
    }
}

/// Launch one tick as its own task so the worker stays responsive.
fn spawn_tick(
    client: &reqwest::Client,
    base: &str,
    updates: &mpsc::Sender<TelemetryUpdate>,
    last_error: &Arc<Mutex<Option<String>>>,
) {
    let client = client.clone();
    let base = base.to_string();
    let updates = updates.clone();
    let last_error = last_error.clone();
    tokio::spawn(async move {
        run_tick(&client, &base, &updates, &last_error).await;
    });
}

/// One poll cycle: fetch every domain concurrently, settle-all.
async fn run_tick(
    client: &reqwest::Client,
    base: &str,
    updates: &mpsc::Sender<TelemetryUpdate>,
    last_error: &Arc<Mutex<Option<String>>>,
) {
    let fetches = Domain::ALL.iter().map(|&domain| async move {
        (domain, fetch_domain(client, base, domain).await)
    });

    let mut failure: Option<String> = None;
    for (domain, result) in join_all(fetches).await {
        match result {
            Ok(snapshot) => {
                debug!(endpoint = domain.endpoint(), fields = snapshot.len(), "snapshot received");
                if updates.send(TelemetryUpdate::new(domain, snapshot)).await.is_err() {
                    // Consumer gone; nothing left to do for this tick.
                    return;
                }
            }
            Err(message) => {
                warn!(endpoint = domain.endpoint(), "{}", message);
                failure.get_or_insert(message);
            }
        }
    }

    *last_error.lock().unwrap() = failure;
}

/// Fetch one endpoint. Transport errors, non-2xx responses and malformed
/// bodies are all per-endpoint failures; none of them propagate.
async fn fetch_domain(
    client: &reqwest::Client,
    base: &str,
    domain: Domain,
) -> Result<TelemetrySnapshot, String> {
    let url = format!("{}{}", base, domain.endpoint());

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("request failed: {}", e))?;

    let response = response
        .error_for_status()
        .map_err(|e| format!("bad status: {}", e))?;

    response
        .json::<TelemetrySnapshot>()
        .await
        .map_err(|e| format!("malformed payload: {}", e))
}

impl TelemetrySource for RestSource {
    fn poll(&mut self) -> Option<TelemetryUpdate> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(_) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Drain updates from the source until `want` arrive or the deadline hits.
    async fn collect_updates(source: &mut RestSource, want: usize, ms: u64) -> Vec<TelemetryUpdate> {
        let mut got = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(ms);
        while got.len() < want && tokio::time::Instant::now() < deadline {
            if let Some(update) = source.poll() {
                got.push(update);
            } else {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
        got
    }

    async fn mock_endpoint(
        server: &mut mockito::ServerGuard,
        path: &str,
        body: &str,
    ) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_partial_failure_applies_surviving_endpoints() {
        let mut server = mockito::Server::new_async().await;
        let _device =
            mock_endpoint(&mut server, "/api/device-information", r#"{"scc_type":"SRNE"}"#).await;
        let _lvd = server
            .mock("GET", "/api/lvd-realtime")
            .with_status(500)
            .create_async()
            .await;
        let _scc = mock_endpoint(&mut server, "/api/scc-realtime", r#"{"pv1_voltage": 48.1}"#).await;
        let _battery = mock_endpoint(&mut server, "/api/battery-realtime", r#"{"soc": 91}"#).await;

        // Long interval; drive the tick manually
        let (mut source, handle) = RestSource::spawn(&server.url(), Duration::from_secs(3600));
        handle.refresh();

        let updates = collect_updates(&mut source, 3, 2000).await;
        let domains: BTreeSet<Domain> = updates.iter().map(|u| u.domain).collect();
        assert_eq!(
            domains,
            BTreeSet::from([Domain::DeviceInfo, Domain::Scc, Domain::Battery])
        );
        assert!(source.error().is_some());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dropped() {
        let mut server = mockito::Server::new_async().await;
        let _device = mock_endpoint(&mut server, "/api/device-information", "not json").await;
        let _lvd =
            mock_endpoint(&mut server, "/api/lvd-realtime", r#"{"system_voltage": 47.5}"#).await;
        let _scc = mock_endpoint(&mut server, "/api/scc-realtime", "{}").await;
        let _battery = mock_endpoint(&mut server, "/api/battery-realtime", "{}").await;

        let (mut source, handle) = RestSource::spawn(&server.url(), Duration::from_secs(3600));
        handle.refresh();

        let updates = collect_updates(&mut source, 3, 2000).await;
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.domain != Domain::DeviceInfo));
        assert!(source.error().unwrap().contains("malformed payload"));
    }

    #[tokio::test]
    async fn test_stop_prevents_scheduled_ticks() {
        let mut server = mockito::Server::new_async().await;
        let device = server
            .mock("GET", "/api/device-information")
            .with_status(200)
            .with_body("{}")
            .expect(0)
            .create_async()
            .await;

        let (mut source, handle) = RestSource::spawn(&server.url(), Duration::from_millis(100));
        handle.stop();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(source.poll().is_none());
        device.assert_async().await;
    }

    #[tokio::test]
    async fn test_manual_refresh_works_while_stopped() {
        let mut server = mockito::Server::new_async().await;
        let _device = mock_endpoint(&mut server, "/api/device-information", "{}").await;
        let _lvd = mock_endpoint(&mut server, "/api/lvd-realtime", "{}").await;
        let _scc = mock_endpoint(&mut server, "/api/scc-realtime", "{}").await;
        let _battery = mock_endpoint(&mut server, "/api/battery-realtime", "{}").await;

        let (mut source, handle) = RestSource::spawn(&server.url(), Duration::from_secs(3600));
        handle.stop();
        handle.refresh();

        let updates = collect_updates(&mut source, 4, 2000).await;
        assert_eq!(updates.len(), 4);
        // Fully successful tick clears the error slot
        assert!(source.error().is_none());
    }

    #[tokio::test]
    async fn test_scheduled_ticks_fire_while_running() {
        let mut server = mockito::Server::new_async().await;
        let _device = mock_endpoint(&mut server, "/api/device-information", "{}").await;
        let _lvd = mock_endpoint(&mut server, "/api/lvd-realtime", "{}").await;
        let _scc = mock_endpoint(&mut server, "/api/scc-realtime", "{}").await;
        let _battery = mock_endpoint(&mut server, "/api/battery-realtime", "{}").await;

        let (mut source, _handle) = RestSource::spawn(&server.url(), Duration::from_millis(100));

        let updates = collect_updates(&mut source, 8, 2000).await;
        assert!(updates.len() >= 8, "expected at least two full ticks");
    }

    #[test]
    fn test_description() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let (source, _handle) =
            RestSource::spawn("http://localhost:5000/", Duration::from_secs(5));
        assert_eq!(source.description(), "poll: http://localhost:5000");
    }
}
