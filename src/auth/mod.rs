pub mod adapters;
pub mod context;
pub mod domain;
pub mod password;
pub mod ports;
pub mod service;
pub mod token;

pub use context::{CancelHandle, ContextError, RequestContext};
pub use domain::{AuthError, AuthResult};
pub use ports::{AppProvider, AuthenticationPort, UserProvider};
pub use service::Auth;
