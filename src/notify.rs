// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process publish/subscribe channel for user-facing notifications.
//!
//! Mutations publish a [`Notification`]; whatever renders them (a terminal
//! printer, a test collector) subscribes to the bus. Listeners run in
//! subscription order and one failing listener never blocks the others.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

pub const SUCCESS_DURATION_MS: u64 = 3_000;
pub const ERROR_DURATION_MS: u64 = 4_000;
pub const WARNING_DURATION_MS: u64 = 4_000;
pub const INFO_DURATION_MS: u64 = 3_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
    Loading,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Loading => "loading",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: Option<u64>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
        duration_ms: Option<u64>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message,
            duration_ms,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::Success,
            title,
            Some(message.into()),
            Some(SUCCESS_DURATION_MS),
        )
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::Error,
            title,
            Some(message.into()),
            Some(ERROR_DURATION_MS),
        )
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::Warning,
            title,
            Some(message.into()),
            Some(WARNING_DURATION_MS),
        )
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::Info,
            title,
            Some(message.into()),
            Some(INFO_DURATION_MS),
        )
    }

    /// Sticky until dismissed.
    pub fn loading(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Loading, title, None, Some(0))
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// A missing or zero duration means the notice stays until dismissed.
    pub fn is_sticky(&self) -> bool {
        matches!(self.duration_ms, None | Some(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type ListenerResult = anyhow::Result<()>;

type Listener = Arc<dyn Fn(&Notification) -> ListenerResult + Send + Sync>;

#[derive(Default)]
struct Listeners {
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Cloneable handle; clones share the same listener set.
#[derive(Clone, Default)]
pub struct NotificationBus {
    listeners: Arc<Mutex<Listeners>>,
    next_id: Arc<AtomicU64>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    // A listener that panicked while we held the lock cannot leave the list
    // half-updated, so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Listeners> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Notification) -> ListenerResult + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().entries.push((id, Arc::new(listener)));
        id
    }

    /// Forwards every notification into a channel. Once the receiver is
    /// dropped the forwarding listener reports an error on each publish.
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(move |n| {
            tx.send(n.clone())
                .map_err(|_| anyhow::anyhow!("notification receiver dropped"))
        });
        (id, rx)
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.lock();
        let before = guard.entries.len();
        guard.entries.retain(|(sid, _)| *sid != id);
        guard.entries.len() != before
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Delivers `notification` to every current listener and returns how many
    /// accepted it.
    pub fn publish(&self, notification: Notification) -> usize {
        // Snapshot first so listeners may (un)subscribe while being called.
        let listeners: Vec<(SubscriptionId, Listener)> = self.lock().entries.clone();
        let mut delivered = 0;
        for (id, listener) in listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(&notification))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => {
                    tracing::error!(subscription = id.0, "notification listener failed: {err:#}");
                }
                Err(_) => {
                    tracing::error!(subscription = id.0, "notification listener panicked");
                }
            }
        }
        tracing::debug!(
            kind = %notification.kind,
            title = %notification.title,
            delivered,
            "published notification"
        );
        delivered
    }
}
