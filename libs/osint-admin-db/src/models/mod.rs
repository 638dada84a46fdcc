pub mod entitlement;
pub mod stats;
pub mod user;

pub use entitlement::{EntitlementAction, EntitlementEvent, ExpiryChange};
pub use stats::UserCounts;
pub use user::User;
