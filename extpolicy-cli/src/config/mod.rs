mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LocationConfig, PolicyConfig, StoreBackend, StoreConfig};
