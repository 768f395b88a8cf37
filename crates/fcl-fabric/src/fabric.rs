use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use fcl_types::{Identity, LedgerTime};

use crate::error::{FabricError, Result};
use crate::event::{EventKind, EventPayload, LedgerEvent};

/// Filter for reading or subscribing to a subset of ledger events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// If set, only events of these kinds match.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only events about this identity match.
    pub subject: Option<Identity>,
    /// If set, only events about this challenge match.
    pub challenge_id: Option<u64>,
    /// If set, only events with a greater sequence number match.
    pub after_seq: Option<u64>,
}

impl EventFilter {
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
            ..Default::default()
        }
    }

    pub fn subject(who: Identity) -> Self {
        Self {
            subject: Some(who),
            ..Default::default()
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        if let Some(ref who) = self.subject {
            if !event.payload.subjects().contains(&who) {
                return false;
            }
        }
        if let Some(id) = self.challenge_id {
            if event.payload.challenge_id() != Some(id) {
                return false;
            }
        }
        if let Some(after) = self.after_seq {
            if event.seq <= after {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for ledger events.
pub type EventStream = broadcast::Receiver<LedgerEvent>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<LedgerEvent>,
}

/// Fan-out router that delivers events to matching subscribers.
struct EventRouter {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventRouter {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    fn subscribe(&self, filter: EventFilter, capacity: usize) -> Result<EventStream> {
        let (tx, rx) = broadcast::channel(capacity);
        self.subscribers
            .write()
            .map_err(|_| FabricError::LockPoisoned)?
            .push(Subscriber { filter, sender: tx });
        Ok(rx)
    }

    /// Route an event to all matching subscribers, pruning closed ones.
    fn route(&self, event: &LedgerEvent) -> Result<()> {
        let mut subs = self
            .subscribers
            .write()
            .map_err(|_| FabricError::LockPoisoned)?;
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        Ok(())
    }

    fn subscriber_count(&self) -> Result<usize> {
        Ok(self
            .subscribers
            .read()
            .map_err(|_| FabricError::LockPoisoned)?
            .len())
    }
}

/// Configuration for the [`EventFabric`].
#[derive(Clone, Debug)]
pub struct FabricConfig {
    /// Capacity of per-subscriber broadcast channels.
    pub channel_capacity: usize,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Append-only event log with filtered fan-out to live subscribers.
///
/// Callers emit under the ledger's write lock, so the order of `emit` calls
/// is commit order and sequence numbers are gap-free.
pub struct EventFabric {
    log: RwLock<Vec<LedgerEvent>>,
    router: EventRouter,
    config: FabricConfig,
}

impl EventFabric {
    pub fn new(config: FabricConfig) -> Self {
        info!(channel_capacity = config.channel_capacity, "fabric started");
        Self {
            log: RwLock::new(Vec::new()),
            router: EventRouter::new(),
            config,
        }
    }

    /// Emit a single event: stamp it with the next seq, append, and route.
    pub fn emit(&self, timestamp: LedgerTime, payload: EventPayload) -> Result<LedgerEvent> {
        let mut events = self.emit_batch(timestamp, vec![payload])?;
        events.pop().ok_or_else(|| FabricError::IntegrityViolation {
            seq: 0,
            reason: "emit produced no event".into(),
        })
    }

    /// Emit several events for one commit.
    ///
    /// All events are appended before any are routed, so subscribers never
    /// observe a partially logged batch.
    pub fn emit_batch(
        &self,
        timestamp: LedgerTime,
        payloads: Vec<EventPayload>,
    ) -> Result<Vec<LedgerEvent>> {
        let stamped = {
            let mut log = self.log.write().map_err(|_| FabricError::LockPoisoned)?;
            let mut next_seq = log.len() as u64 + 1;
            let mut stamped = Vec::with_capacity(payloads.len());
            for payload in payloads {
                stamped.push(LedgerEvent::new(next_seq, timestamp, payload)?);
                next_seq += 1;
            }
            log.extend(stamped.iter().cloned());
            stamped
        };

        for event in &stamped {
            self.router.route(event)?;
            debug!(id = %event.id, seq = event.seq, kind = %event.kind, "event emitted");
        }
        Ok(stamped)
    }

    /// Subscribe to future events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> Result<EventStream> {
        self.router.subscribe(filter, self.config.channel_capacity)
    }

    /// Logged events matching `filter`, in commit order.
    pub fn events(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>> {
        let log = self.log.read().map_err(|_| FabricError::LockPoisoned)?;
        Ok(log.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.log.read().map_err(|_| FabricError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Check sequence contiguity, timestamp order, and every integrity hash.
    pub fn verify(&self) -> Result<()> {
        let log = self.log.read().map_err(|_| FabricError::LockPoisoned)?;
        let mut last_time = LedgerTime::zero();
        for (index, event) in log.iter().enumerate() {
            let expected_seq = index as u64 + 1;
            if event.seq != expected_seq {
                return Err(FabricError::IntegrityViolation {
                    seq: event.seq,
                    reason: format!("expected seq {expected_seq}"),
                });
            }
            if event.timestamp < last_time {
                return Err(FabricError::IntegrityViolation {
                    seq: event.seq,
                    reason: "timestamp earlier than previous event".into(),
                });
            }
            if !event.verify_integrity() {
                return Err(FabricError::IntegrityViolation {
                    seq: event.seq,
                    reason: "integrity hash mismatch".into(),
                });
            }
            last_time = event.timestamp;
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> Result<usize> {
        self.router.subscriber_count()
    }
}

impl Default for EventFabric {
    fn default() -> Self {
        Self::new(FabricConfig::default())
    }
}
