//! User notifications
//!
//! Editors report outcomes through a [`Notifier`]. Notifying never fails and
//! never blocks the caller.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Info,
	Success,
	Warning,
	Error,
}

impl Level {
	pub fn as_str(&self) -> &'static str {
		match self {
			Level::Info => "info",
			Level::Success => "success",
			Level::Warning => "warning",
			Level::Error => "error",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	pub level: Level,
	pub message: String,
}

impl Notification {
	pub fn new(level: Level, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
		}
	}
}

/// Sink for user-facing notifications, such as a toast area.
pub trait Notifier: Send + Sync {
	fn notify(&self, level: Level, message: &str);
}

/// In-memory notifier
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
	notifications: Arc<Mutex<VecDeque<Notification>>>,
}

impl MemoryNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Notifications received so far, oldest first.
	pub fn peek(&self) -> Vec<Notification> {
		self.notifications.lock().iter().cloned().collect()
	}

	/// Removes and returns every notification.
	pub fn drain(&self) -> Vec<Notification> {
		self.notifications.lock().drain(..).collect()
	}

	pub fn last(&self) -> Option<Notification> {
		self.notifications.lock().back().cloned()
	}

	pub fn clear(&self) {
		self.notifications.lock().clear();
	}
}

impl Notifier for MemoryNotifier {
	fn notify(&self, level: Level, message: &str) {
		self.notifications
			.lock()
			.push_back(Notification::new(level, message));
	}
}

/// Notifier that writes every notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
	fn notify(&self, level: Level, message: &str) {
		match level {
			Level::Info | Level::Success => {
				tracing::info!(level = level.as_str(), "{message}")
			}
			Level::Warning => tracing::warn!("{message}"),
			Level::Error => tracing::error!("{message}"),
		}
	}
}
