#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use birthday_countdown::models::EpochMillis;
use chrono::DateTime;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the
/// process-global environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Every variable the crate reads, cleared so the host environment cannot leak in.
pub const CLEAN_ENV: &[(&str, Option<&str>)] = &[
    ("REPOSITORY_TYPE", None),
    ("CLOUDFLARE_ACCOUNT_ID", None),
    ("CLOUDFLARE_API_TOKEN", None),
    ("CLOUDFLARE_KV_NAMESPACE_ID", None),
    ("CLOUDFLARE_API_BASE", None),
    ("KV_TIMEOUT_SECS", None),
    ("HOST", None),
    ("PORT", None),
    ("APP_ENV", None),
    ("ANNIVERSARY_MONTH", None),
    ("ANNIVERSARY_DAY", None),
    ("ANNIVERSARY_OFFSET_MINUTES", None),
];

/// [`CLEAN_ENV`] with `changes` applied on top.
pub fn env_with(
    changes: &[(&'static str, Option<&'static str>)],
) -> Vec<(&'static str, Option<&'static str>)> {
    let mut env: Vec<_> = CLEAN_ENV
        .iter()
        .filter(|(k, _)| !changes.iter().any(|(c, _)| c == k))
        .copied()
        .collect();
    env.extend_from_slice(changes);
    env
}

/// Parse an RFC 3339 timestamp into epoch milliseconds.
pub fn instant(rfc3339: &str) -> EpochMillis {
    EpochMillis::from_datetime(
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .to_utc(),
    )
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
