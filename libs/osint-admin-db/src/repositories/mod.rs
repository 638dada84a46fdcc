pub mod entitlement_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use entitlement_repo::{EntitlementRepository, NewEntitlementEvent};
pub use subscription_repo::SubscriptionRepository;
pub use user_repo::UserRepository;
