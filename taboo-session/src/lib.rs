pub mod config;
pub mod console;
pub mod content;
pub mod session;

pub use config::{Config, ConfigError};
pub use content::{
    ContentProvider, DirectoryContentProvider, RemoteContentProvider, StaticContentProvider,
    load_or_empty,
};
pub use session::GameSession;
