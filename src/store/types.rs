use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::initiative::Initiative;

pub const STORE_VERSION: u32 = 1;

/// Everything persisted between runs: the initiatives and the revenue rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    /// Monthly revenue per user used for the ARR uplift figure
    pub arpu: f64,
    #[serde(default)]
    pub entries: Vec<Initiative>,
}

impl Store {
    /// Create an empty store with the given revenue rate
    pub fn new(arpu: f64) -> Self {
        Self {
            version: STORE_VERSION,
            arpu,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, initiative: Initiative) {
        self.entries.push(initiative);
    }

    pub fn get(&self, id: &str) -> Option<&Initiative> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Apply `f` to the initiative with `id` and bump its `updated_at`.
    /// Returns false if no such initiative exists.
    pub fn update<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Initiative),
    {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                f(entry);
                entry.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Remove an initiative.
    /// Returns true if it was present, false otherwise
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Replace every stored initiative (used by import)
    pub fn replace_entries(&mut self, entries: Vec<Initiative>) {
        self.entries = entries;
    }

    /// Set the revenue rate. Only finite positive values are accepted.
    pub fn set_arpu(&mut self, arpu: f64) -> bool {
        if arpu.is_finite() && arpu > 0.0 {
            self.arpu = arpu;
            true
        } else {
            false
        }
    }
}
