pub mod endpoints;
pub mod preferences;
pub mod store;

pub use endpoints::{
    DEFAULT_ETH_RPC, DEFAULT_GRAPH_API, EndpointConfig, EndpointStore, EndpointUpdate,
};
pub use preferences::{
    AppliedMode, NotificationSettings, Preferences, Profile, ThemeMode, ThemeVariant,
};
pub use store::{FileStore, LocalStore, MemoryStore, get_json, set_json};
