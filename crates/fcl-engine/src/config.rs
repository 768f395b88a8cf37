use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fcl_types::{Identity, LedgerClock, LedgerTime, ManualClock, SystemClock};

/// Which time source the engine stamps mutations with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    #[default]
    System,
    Manual,
}

/// Engine settings, the `[engine]` table of the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Owner installed at initialization. When unset, the initializing
    /// caller becomes the owner.
    pub initial_owner: Option<Identity>,
    /// Capacity of each event subscriber's broadcast channel.
    pub event_channel_capacity: usize,
    pub clock: ClockSource,
    /// Starting time of the manual clock, in seconds.
    pub manual_start: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_owner: None,
            event_channel_capacity: 1024,
            clock: ClockSource::System,
            manual_start: 1_700_000_000,
        }
    }
}

impl EngineConfig {
    /// Owner for a ledger initialized by `deployer`.
    pub fn owner_for(&self, deployer: &Identity) -> Identity {
        self.initial_owner.clone().unwrap_or_else(|| deployer.clone())
    }

    pub fn build_clock(&self) -> Arc<dyn LedgerClock> {
        match self.clock {
            ClockSource::System => Arc::new(SystemClock::new()),
            ClockSource::Manual => {
                Arc::new(ManualClock::new(LedgerTime::from_secs(self.manual_start)))
            }
        }
    }
}
