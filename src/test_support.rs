use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use tokio::sync::Semaphore;
use url::Url;

use crate::engine::{Presenter, Snapshot};
use crate::error::{Result, StatusError};
use crate::http_probe::Transport;
use crate::registry::{Category, ProbeDescriptor, Service, ServiceRegistry};

/// In-memory transport: per-URL reachability, a canned manifest, an optional gate that
/// holds every probe until permits are added, and URLs whose probe task panics.
#[derive(Default)]
pub struct ScriptedTransport {
    reachable: HashMap<String, bool>,
    manifest: Option<Value>,
    gate: Option<Arc<Semaphore>>,
    panicking: Vec<String>,
    probes: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reachable(mut self, url: &str) -> Self {
        self.reachable.insert(url.to_string(), true);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.reachable.insert(url.to_string(), false);
        self
    }

    pub fn manifest(mut self, body: Value) -> Self {
        self.manifest = Some(body);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn panicking(mut self, url: &str) -> Self {
        self.panicking.push(url.to_string());
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

fn refused(url: &Url) -> StatusError {
    StatusError::transport(
        url.as_str(),
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
    )
}

impl Transport for ScriptedTransport {
    async fn reach(&self, target: &Url) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }
        if self.panicking.iter().any(|url| url == target.as_str()) {
            panic!("scripted panic for {target}");
        }
        match self.reachable.get(target.as_str()) {
            Some(true) => Ok(()),
            _ => Err(refused(target)),
        }
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value> {
        self.manifest.clone().ok_or_else(|| refused(url))
    }
}

/// Registry of `(category, [(service, url)])` rows, all accepting 200.
pub fn registry_of(rows: &[(&str, &[(&str, &str)])]) -> ServiceRegistry {
    let categories = rows
        .iter()
        .map(|(name, services)| Category {
            name: name.to_string(),
            services: services
                .iter()
                .map(|(service, url)| Service {
                    name: service.to_string(),
                    descriptor: ProbeDescriptor::new(Url::parse(url).unwrap(), [200]),
                })
                .collect(),
        })
        .collect();
    ServiceRegistry::new(categories).unwrap()
}

/// Lets spawned tasks (and aborted ones) run on the current-thread test runtime.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Presenter that remembers what it was given.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub snapshots: Arc<Mutex<Vec<Snapshot>>>,
    pub elapsed: Arc<Mutex<Vec<String>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
}

impl Presenter for RecordingPresenter {
    fn present_snapshot(&self, snapshot: &Snapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }

    fn present_elapsed(&self, elapsed: &str) {
        self.elapsed.lock().unwrap().push(elapsed.to_string());
    }

    fn present_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
