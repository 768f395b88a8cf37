//! Built-in gate stages.

pub mod eligibility;
pub mod role;
pub mod validation;

pub use eligibility::EligibilityStage;
pub use role::RoleStage;
pub use validation::ValidationStage;
