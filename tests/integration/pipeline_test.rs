//! End-to-end runs of the orchestrator with scripted sources and an
//! in-memory delivery channel, on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use pulsegram::core::batch::{DeliveryRequest, HostMeta};
use pulsegram::core::orchestrator::Orchestrator;
use pulsegram::core::trigger::{DeliveryTrigger, TriggerKind};
use pulsegram::error::{NotifyError, SourceError};
use pulsegram::notify::{render_report, Ack, Notifier};
use pulsegram::sources::MetricSource;

struct ConstSource {
    name: &'static str,
    value: f64,
}

impl MetricSource for ConstSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&mut self) -> Result<f64, SourceError> {
        Ok(self.value)
    }
}

struct DeadSource;

impl MetricSource for DeadSource {
    fn name(&self) -> &'static str {
        "temp"
    }

    fn read(&mut self) -> Result<f64, SourceError> {
        Err(SourceError::permission_denied("temp"))
    }
}

#[derive(Default)]
struct ChannelSink {
    sent: Mutex<Vec<DeliveryRequest>>,
}

impl Notifier for ChannelSink {
    fn name(&self) -> &'static str {
        "sink"
    }

    fn deliver(&self, request: &DeliveryRequest) -> Result<Ack, NotifyError> {
        self.sent.lock().push(request.clone());
        Ok(Ack::default())
    }
}

fn host() -> HostMeta {
    HostMeta {
        hostname: "vault".to_string(),
        distro: "Debian 13".to_string(),
        cores: 8,
        total_memory_bytes: 16 << 30,
    }
}

fn gpu_less_sources() -> Vec<Box<dyn MetricSource>> {
    vec![
        Box::new(ConstSource {
            name: "cpu",
            value: 12.5,
        }),
        Box::new(ConstSource {
            name: "ram",
            value: 60.0,
        }),
        Box::new(ConstSource {
            name: "temp",
            value: 47.0,
        }),
    ]
}

fn fire_after(trigger: Arc<DeliveryTrigger>, secs: u64, kind: TriggerKind) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        trigger.fire(kind);
    });
}

#[tokio::test(start_paused = true)]
async fn test_flush_then_shutdown_produces_two_batches() {
    let sink = Arc::new(ChannelSink::default());
    let orch = Orchestrator::new(
        gpu_less_sources(),
        Arc::clone(&sink) as Arc<dyn Notifier>,
        host(),
        Duration::from_secs(5),
    );
    let trigger = orch.trigger();

    // Ticks at 5s, 10s and 15s land before the flush at 16s; the shutdown at
    // 18s then closes an empty second cycle.
    fire_after(Arc::clone(&trigger), 16, TriggerKind::Flush);
    fire_after(trigger, 18, TriggerKind::Shutdown);

    orch.run(|_, _| {}).await.unwrap();

    let sent = sink.sent.lock();
    assert_eq!(sent.len(), 2);

    let first = &sent[0];
    assert_eq!(first.cycle, 1);
    assert_eq!(first.batch.sample_count(), 3);
    for metric in ["cpu", "ram", "temp"] {
        let series = first.batch.series(metric).unwrap();
        assert_eq!(series.len(), 3);
        let indices: Vec<u64> = series.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    let second = &sent[1];
    assert_eq!(second.cycle, 2);
    assert!(second.batch.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_gpu_means_no_gpu_key_anywhere() {
    let sink = Arc::new(ChannelSink::default());
    let orch = Orchestrator::new(
        gpu_less_sources(),
        Arc::clone(&sink) as Arc<dyn Notifier>,
        host(),
        Duration::from_secs(5),
    );
    let trigger = orch.trigger();

    fire_after(trigger, 6, TriggerKind::Shutdown);

    orch.run(|_, _| {}).await.unwrap();

    let sent = sink.sent.lock();
    let request = &sent[0];

    // The series map must omit the key entirely, not carry an empty series.
    assert!(!request.batch.has_metric("gpu"));
    let wire = serde_json::to_value(request).unwrap();
    assert!(wire["batch"]["series"].get("gpu").is_none());
    assert!(wire["batch"]["series"].get("cpu").is_some());

    // And the rendered report shows the gap explicitly.
    let report = render_report(request);
    assert!(report.contains("GPU: N/A"));
    assert!(report.starts_with("vault with Debian 13"));
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_exits_with_error_and_no_deliveries() {
    let sink = Arc::new(ChannelSink::default());
    let orch = Orchestrator::new(
        vec![
            Box::new(ConstSource {
                name: "cpu",
                value: 5.0,
            }),
            Box::new(DeadSource),
        ],
        Arc::clone(&sink) as Arc<dyn Notifier>,
        host(),
        Duration::from_secs(5),
    );

    let result = orch.run(|_, _| {}).await;

    assert!(result.is_err());
    assert!(sink.sent.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_progress_counts_restart_with_each_cycle() {
    let sink = Arc::new(ChannelSink::default());
    let orch = Orchestrator::new(
        gpu_less_sources(),
        Arc::clone(&sink) as Arc<dyn Notifier>,
        host(),
        Duration::from_secs(5),
    );
    let trigger = orch.trigger();

    fire_after(Arc::clone(&trigger), 11, TriggerKind::Flush);
    fire_after(trigger, 22, TriggerKind::Shutdown);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    orch.run(move |cycle, count| sink_seen.lock().push((cycle, count)))
        .await
        .unwrap();

    // Cycle 1 ticks at 5s and 10s; cycle 2 restarts its clock at 11s and
    // ticks at 16s and 21s.
    assert_eq!(*seen.lock(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}
