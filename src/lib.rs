pub mod providers;
pub mod types;

pub use providers::{AlertProvider, PrometheusProvider, ProviderConfig, ProviderError};
pub use types::{AlertDto, AlertSeverity, AlertStatus};
