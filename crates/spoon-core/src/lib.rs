//! # Spoon Tracker Core Library
//!
//! This library provides the core logic for Spoon Tracker, a "spoon theory"
//! energy tracker: a finite daily budget of spoons, spent by completing
//! activities. The CLI binary is a thin front-end over this crate.
//!
//! ## Architecture
//!
//! - **Ledger**: Pure, synchronous resource accounting with no I/O
//! - **Tracker**: The ledger plus an injected telemetry sink
//! - **Presenter**: Commands in, views and notices out, for any front-end
//! - **Health**: HTTP probe of a deployed widget with JUnit output
//!
//! ## Key Components
//!
//! - [`Ledger`]: Spoon counter, activity queue and derived statistics
//! - [`SpoonTracker`]: Ledger operations with telemetry reporting
//! - [`TelemetrySink`]: Trait for telemetry destinations
//! - [`HealthProbe`]: Deployment health checks
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod health;
pub mod heartbeat;
pub mod ledger;
pub mod presenter;
pub mod storage;
pub mod telemetry;
pub mod tracker;

pub use error::{ConfigError, CoreError, HealthError, TelemetryError, ValidationError};
pub use events::{EventKind, SessionContext, TelemetryEvent};
pub use health::{CheckResult, CheckStatus, HealthProbe, HealthReport};
pub use heartbeat::HeartbeatSchedule;
pub use ledger::{parse_cost, Activity, ActivityId, DaySummary, EnergyLevel, Ledger, DAILY_SPOONS};
pub use presenter::{dispatch, Command, LedgerView, Notice, Renderer, TextRenderer};
pub use storage::{Config, SinkKind};
pub use telemetry::{
    FanOutSink, HttpSink, JsonLinesSink, LogSink, MemorySink, NullSink, TelemetrySink,
};
pub use tracker::SpoonTracker;
