//! # ETI Receiver Configuration
//!
//! Defaults, file loading and environment overrides for the receiver.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults ([`defaults`])
//! 2. An optional TOML file
//! 3. `ETI_RX_*` environment variables, `__` separating sections
//!    (e.g. `ETI_RX_SOURCE__PORT=9100`)
//! 4. Command-line overrides ([`Overrides`])
//!
//! ```rust,no_run
//! use eti_config::{Overrides, ReceiverConfig};
//!
//! let mut config = ReceiverConfig::load(None)?;
//! config.apply(&Overrides {
//!     host: Some("localhost".into()),
//!     port: Some(9100),
//!     ..Overrides::default()
//! });
//! config.validate()?;
//! assert_eq!(config.endpoint(), "tcp://localhost:9100");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod receiver_config;

// Re-export commonly used types
pub use receiver_config::{
    DiagnosticsConfig, ErrorConfig, ErrorPolicy, LoggingConfig, OutputConfig, Overrides,
    ReceiverConfig, SourceConfig,
};
