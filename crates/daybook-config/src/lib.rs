//! Configuration loading and validation (`~/.config/daybook/config.toml`).

pub mod config;
pub mod paths;
pub mod validate;

pub use config::{
    DaybookConfig, FirebaseConfig, JournalConfig, LockConfig, StoreBackend, StoreConfig,
    UnavailablePolicy,
};
pub use validate::validate_config;
