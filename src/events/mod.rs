//! Scheduler events: types and bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload
//! - [`EventBus`] per-kind subscriber registry with synchronous delivery
//!
//! ## Quick reference
//! - **Publisher**: the scheduler's completion path (`Error` per failed task,
//!   `Idle` once per drain while running).
//! - **Consumers**: anything implementing [`Subscribe`](crate::Subscribe),
//!   including plain closures `Fn(&Event)`.

mod bus;
mod event;

pub use bus::EventBus;
pub use event::{Event, EventKind};
