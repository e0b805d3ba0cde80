//! Named export table for the boundary operations, plus the readiness hook.
//!
//! The cryptographic core knows nothing about how it is invoked. An embedding
//! host builds an [`Exports`] once, optionally attaches a
//! [`ReadinessObserver`], and calls [`Exports::announce`] when it is ready to
//! accept calls.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{ReadyReport, ResultEnvelope};
use tracing::info;

use crate::envelope;
use crate::error::CryptoError;
use crate::key::KeyMaterial;

/// Export name of the encrypt operation.
pub const ENCRYPT: &str = "encrypt";

/// Export name of the decrypt operation.
pub const DECRYPT: &str = "decrypt";

/// Export name of the key diagnostic. Its argument is ignored.
pub const KEY_INFO: &str = "key_info";

type Operation = Box<dyn Fn(&str) -> ResultEnvelope + Send + Sync>;

/// Receives a one-time notification that the exported operations are callable.
#[cfg_attr(test, mockall::automock)]
pub trait ReadinessObserver: Send + Sync {
    /// Called once, with the names now callable.
    fn on_ready(&self, functions: &[String]);
}

/// Table of operations callable by name with a single string argument.
pub struct Exports {
    operations: BTreeMap<&'static str, Operation>,
    observer: Option<Box<dyn ReadinessObserver>>,
    announced: AtomicBool,
}

impl Exports {
    /// An empty table with no observer.
    pub fn new() -> Self {
        Self {
            operations: BTreeMap::new(),
            observer: None,
            announced: AtomicBool::new(false),
        }
    }

    /// A table exporting [`ENCRYPT`], [`DECRYPT`] and [`KEY_INFO`] under `key`.
    ///
    /// `key_info` answers with the serialised [`KeyInfo`](common::KeyInfo) as
    /// its `data`.
    pub fn with_core(key: Arc<KeyMaterial>) -> Self {
        let mut exports = Self::new();
        let k = Arc::clone(&key);
        exports.register(ENCRYPT, move |plaintext| envelope::encrypt(plaintext, &k));
        let k = Arc::clone(&key);
        exports.register(DECRYPT, move |encoded| envelope::decrypt(encoded, &k));
        exports.register(KEY_INFO, move |_| match serde_json::to_string(&key.info()) {
            Ok(info) => {
                let length = info.len();
                ResultEnvelope::success(info, length)
            }
            Err(e) => envelope::failed(&CryptoError::InvalidJson(e)),
        });
        exports
    }

    /// Export `op` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &'static str, op: F)
    where
        F: Fn(&str) -> ResultEnvelope + Send + Sync + 'static,
    {
        self.operations.insert(name, Box::new(op));
    }

    /// Attach the observer notified by [`Exports::announce`].
    pub fn with_observer(mut self, observer: impl ReadinessObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Exported names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.operations.keys().map(|n| (*n).to_owned()).collect()
    }

    /// Whether an operation is exported as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Call the operation exported as `name`.
    ///
    /// An unknown name yields a failure envelope rather than a panic.
    pub fn invoke(&self, name: &str, arg: &str) -> ResultEnvelope {
        match self.operations.get(name) {
            Some(op) => op(arg),
            None => ResultEnvelope::failure(format!("unknown operation: {name}")),
        }
    }

    /// Report readiness. The observer, if any, is notified on the first call
    /// only; every call returns the same report.
    pub fn announce(&self) -> ReadyReport {
        let functions = self.names();
        if !self.announced.swap(true, Ordering::AcqRel) {
            info!(functions = ?functions, "sealer operations ready");
            if let Some(observer) = &self.observer {
                observer.on_ready(&functions);
            }
        }
        ReadyReport {
            status: "ready".into(),
            functions,
        }
    }

    /// Whether [`Exports::announce`] has run.
    pub fn is_announced(&self) -> bool {
        self.announced.load(Ordering::Acquire)
    }
}

impl Default for Exports {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Exports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exports")
            .field("operations", &self.names())
            .field("has_observer", &self.observer.is_some())
            .field("announced", &self.is_announced())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Exports {
        let key = KeyMaterial::from_slice(&[0x11u8; 32]).unwrap();
        Exports::with_core(Arc::new(key))
    }

    #[test]
    fn core_exports_encrypt_decrypt_and_key_info() {
        let exports = core();
        assert_eq!(exports.names(), vec!["decrypt", "encrypt", "key_info"]);
        assert!(exports.contains(KEY_INFO));
        assert!(exports.contains(ENCRYPT));
        assert!(!exports.contains("getHost"));
    }

    #[test]
    fn invoke_by_name_round_trips() {
        let exports = core();
        let sealed = exports.invoke(ENCRYPT, "by name");
        assert!(sealed.success);
        let opened = exports.invoke(DECRYPT, sealed.data.as_deref().unwrap());
        assert_eq!(opened.data.as_deref(), Some("by name"));
    }

    #[test]
    fn key_info_by_name_matches_key() {
        let key = Arc::new(KeyMaterial::from_slice(&[0x11u8; 32]).unwrap());
        let exports = Exports::with_core(Arc::clone(&key));
        let env = exports.invoke(KEY_INFO, "ignored");
        assert!(env.success);
        let data = env.data.unwrap();
        assert_eq!(env.length, Some(data.len()));
        let info: common::KeyInfo = serde_json::from_str(&data).unwrap();
        assert_eq!(info, key.info());
        assert_eq!(info.key_size, 32);
    }

    #[test]
    fn unknown_name_is_a_failure_envelope() {
        let env = core().invoke("frobnicate", "x");
        assert!(!env.success);
        assert!(env.error.unwrap().contains("frobnicate"));
    }

    #[test]
    fn announce_without_observer() {
        let exports = core();
        assert!(!exports.is_announced());
        let report = exports.announce();
        assert_eq!(report.status, "ready");
        assert_eq!(report.functions, vec!["decrypt", "encrypt", "key_info"]);
        assert!(exports.is_announced());
    }

    #[test]
    fn observer_is_notified_exactly_once() {
        let mut observer = MockReadinessObserver::new();
        observer
            .expect_on_ready()
            .withf(|functions: &[String]| {
                functions.len() == 3
                    && functions[0] == DECRYPT
                    && functions[1] == ENCRYPT
                    && functions[2] == KEY_INFO
            })
            .times(1)
            .return_const(());

        let exports = core().with_observer(observer);
        let first = exports.announce();
        let second = exports.announce();
        assert_eq!(first, second);
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut exports = core();
        exports.register(ENCRYPT, |_| ResultEnvelope::failure("disabled"));
        assert_eq!(exports.invoke(ENCRYPT, "x").error.as_deref(), Some("disabled"));
        assert_eq!(exports.names().len(), 3);
    }
}
