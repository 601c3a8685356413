pub mod lighting;
pub mod quality;
pub mod white_balance;

pub use lighting::{LightingCondition, LightingReport};
pub use quality::{QualityGate, QualityIssue, QualityReport};
pub use white_balance::WhiteBalanceGains;
