pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod hooks;
pub mod http;
pub mod models;
pub mod navigation;
pub mod session;
pub mod token;

pub use api::ApiClient;
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionState};
pub use token::TokenStore;
