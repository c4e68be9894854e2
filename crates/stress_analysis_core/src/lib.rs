pub mod domain;
pub mod extract;
pub mod ports;
pub mod report;
pub mod sanitize;
pub mod validate;

pub use domain::{
    AnalysisRecord, AnalysisReport, AnalysisRequest, AuthenticatedUser, EmotionalTone,
    HealthIssue, Severity, StressLevel,
};
pub use ports::{AnalysisStore, CompletionService, IdentityService, PortError, PortResult};
