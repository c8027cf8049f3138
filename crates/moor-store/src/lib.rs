//! Parse → Mutate → Serialize stores over the three configuration files Moor
//! manages: the hosts file, the OpenSSH client config, and the SSH key
//! directory. The stores are print-free; all terminal interaction lives in
//! the CLI crate.

pub mod error;
pub mod hosts;
pub mod ssh_config;
pub mod ssh_keys;

pub use error::StoreError;
