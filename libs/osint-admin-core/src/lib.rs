pub mod backend;
pub mod command;
pub mod error;
pub mod format;
pub mod gate;
pub mod receiver;
pub mod service;
pub mod store;
pub mod test_util;
pub mod wire;

pub use backend::AdminBackend;
pub use error::{AdminError, AdminResult, ErrorKind};
pub use gate::{AdminGate, AdminIdentity};
pub use service::{AdminService, Pricing};
pub use store::{EntitlementStore, PgStore};
