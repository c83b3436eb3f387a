// src/sessions.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::record::Dataset;

pub const SESSION_COOKIE: &str = "dashboard_session";
pub const TOKEN_BYTES: usize = 32;

/// A session that has not been touched for this long is evicted.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

struct Entry {
    dataset: Dataset,
    last_access: i64,
}

/// In-memory map from session token to that browser's dataset.
/// Nothing here survives a restart, which is the point: uploaded files
/// live exactly as long as the process. Entries expire on a sliding
/// TTL so abandoned sessions do not accumulate for the process's life;
/// expired entries are swept on every insert and lookup.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the dataset under a fresh token and returns the token.
    pub fn create(&self, dataset: Dataset) -> String {
        let token = generate_token_default();
        self.insert(token.clone(), dataset);
        token
    }

    pub fn insert(&self, token: String, dataset: Dataset) {
        self.insert_at(token, dataset, now_unix());
    }

    pub fn get(&self, token: &str) -> Option<Dataset> {
        self.get_at(token, now_unix())
    }

    pub fn remove(&self, token: &str) -> bool {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(token).is_some()
    }

    fn insert_at(&self, token: String, dataset: Dataset, now: i64) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut map, now);
        map.insert(
            token,
            Entry {
                dataset,
                last_access: now,
            },
        );
    }

    /// Lookup refreshes the entry's TTL.
    fn get_at(&self, token: &str, now: i64) -> Option<Dataset> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut map, now);
        map.get_mut(token).map(|entry| {
            entry.last_access = now;
            entry.dataset.clone()
        })
    }

    fn sweep(map: &mut HashMap<String, Entry>, now: i64) {
        map.retain(|_, entry| now - entry.last_access < SESSION_TTL_SECS);
    }
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Generate a secure random token using the OS RNG.
pub fn generate_token_default() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, TOKEN_BYTES)
}

/// Generate a URL-safe token from random bytes.
/// - Uses Base64 URL-safe, no padding.
/// - 32 bytes -> ~43 char token.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Pulls the session token out of a Cookie header value.
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
