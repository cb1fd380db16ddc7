pub mod flat_files;

pub use flat_files::{load_accounts, load_proxies};
