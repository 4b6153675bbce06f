//! Subscription broker for metric events and alerts.
//!
//! Delivery is synchronous and in registration order. A panicking
//! subscriber is contained per-callback so the remaining subscribers still
//! receive the event and the engine never crashes from a subscriber fault.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::{Alert, MetricRecord};

type MetricCallback = Arc<dyn Fn(&MetricRecord) + Send + Sync>;
type AlertCallback = Arc<dyn Fn(&Alert) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Metric,
    Alert,
}

/// Broker holding metric and alert subscribers.
pub struct ObserverRegistry {
    next_id: AtomicU64,
    metric_subscribers: Mutex<Vec<(u64, MetricCallback)>>,
    alert_subscribers: Mutex<Vec<(u64, AlertCallback)>>,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            metric_subscribers: Mutex::new(Vec::new()),
            alert_subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a metric subscriber; keep the handle to unsubscribe.
    #[must_use]
    pub fn subscribe_metric(
        self: &Arc<Self>,
        callback: impl Fn(&MetricRecord) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.metric_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        Subscription {
            registry: Arc::clone(self),
            id,
            channel: Channel::Metric,
        }
    }

    /// Registers an alert subscriber; keep the handle to unsubscribe.
    #[must_use]
    pub fn subscribe_alert(
        self: &Arc<Self>,
        callback: impl Fn(&Alert) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.alert_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        Subscription {
            registry: Arc::clone(self),
            id,
            channel: Channel::Alert,
        }
    }

    /// Delivers a metric record to every subscriber in registration order.
    pub fn notify_metric(&self, record: &MetricRecord) {
        // Snapshot under the lock, deliver outside it, so a callback that
        // subscribes or cancels cannot deadlock the broker.
        let subscribers: Vec<MetricCallback> = self
            .metric_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in subscribers {
            if std::panic::catch_unwind(AssertUnwindSafe(|| callback(record))).is_err() {
                tracing::warn!("metric subscriber panicked; continuing delivery");
            }
        }
    }

    /// Delivers an alert to every subscriber in registration order.
    pub fn notify_alert(&self, alert: &Alert) {
        let subscribers: Vec<AlertCallback> = self
            .alert_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in subscribers {
            if std::panic::catch_unwind(AssertUnwindSafe(|| callback(alert))).is_err() {
                tracing::warn!("alert subscriber panicked; continuing delivery");
            }
        }
    }

    #[must_use]
    pub fn metric_subscriber_count(&self) -> usize {
        self.metric_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn alert_subscriber_count(&self) -> usize {
        self.alert_subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn unsubscribe(&self, channel: Channel, id: u64) {
        match channel {
            Channel::Metric => self
                .metric_subscribers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .retain(|(sub_id, _)| *sub_id != id),
            Channel::Alert => self
                .alert_subscribers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .retain(|(sub_id, _)| *sub_id != id),
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to an active subscription. Dropping it without calling
/// [`Subscription::cancel`] leaves the subscription active.
pub struct Subscription {
    registry: Arc<ObserverRegistry>,
    id: u64,
    channel: Channel,
}

impl Subscription {
    /// Removes the subscriber from the registry.
    pub fn cancel(self) {
        self.registry.unsubscribe(self.channel, self.id);
    }
}
