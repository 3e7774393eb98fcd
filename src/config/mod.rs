pub mod app_config;
pub mod credentials;
pub mod provider_config;

pub use app_config::*;
pub use credentials::ProviderCredentials;
pub use provider_config::*;
