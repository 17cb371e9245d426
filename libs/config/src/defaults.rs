//! Receiver defaults

/// Publisher host when none is configured
pub const DEFAULT_HOST: &str = "localhost";

/// No default port; one must come from the file, environment or CLI
pub const UNSET_PORT: u16 = 0;

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ETI_RX";

/// Separator between section and key in environment overrides
pub const ENV_SEPARATOR: &str = "__";

pub use eti_codec::DEFAULT_MAX_MESSAGE_SIZE;
