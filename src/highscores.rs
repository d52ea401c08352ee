//! Persisted highscore
//!
//! A single integer stored as `{"highscore": N}` under the `highscore` key.
//! Older saves wrote the bare number, which is still accepted.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Storage key
pub const STORAGE_KEY: &str = "highscore";

/// Stored highscore record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Highscore {
    pub highscore: u32,
}

impl Highscore {
    /// Decode a stored value; anything unreadable is 0
    pub fn decode(raw: &str) -> u32 {
        if let Ok(record) = serde_json::from_str::<Highscore>(raw) {
            return record.highscore;
        }
        raw.trim().parse::<u32>().unwrap_or(0)
    }

    pub fn encode(value: u32) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&Highscore { highscore: value })?)
    }
}

/// Load the highscore; missing or corrupt storage yields 0
pub fn load_highscore(store: &dyn KeyValueStore) -> u32 {
    match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => {
            let value = Highscore::decode(&raw);
            log::info!("Loaded highscore {}", value);
            value
        }
        Ok(None) => {
            log::info!("No highscore found, starting fresh");
            0
        }
        Err(e) => {
            log::warn!("Failed to read highscore: {}", e);
            0
        }
    }
}

/// Persist the highscore
pub fn save_highscore(store: &mut dyn KeyValueStore, value: u32) -> Result<(), StoreError> {
    let json = Highscore::encode(value)?;
    store.set(STORAGE_KEY, &json)?;
    log::info!("Highscore {} saved", value);
    Ok(())
}
