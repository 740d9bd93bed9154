//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the optional built-in
//! [`LogWriter`] implementation.
//!
//! ## Architecture
//! ```text
//! consumer completion ── emit(Event) ──► EventBus ──► Subscribe::on_event(&Event)
//!                                                          │
//!                                               ┌──────────┼──────────┐
//!                                               ▼          ▼          ▼
//!                                           LogWriter   closure    custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```
//! use tasklane::{Event, Subscribe};
//!
//! struct FailureCounter(std::sync::atomic::AtomicUsize);
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, event: &Event) {
//!         if let Event::Error { .. } = event {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
