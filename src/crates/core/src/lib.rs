// Email Classifier Core Library - Platform-agnostic client logic
// Four-layer architecture: Util -> Infrastructure -> Service -> Session

pub mod infrastructure; // Infrastructure layer - HTTP API client, error body decoding
pub mod service; // Service layer - Config, input validation, health monitoring
pub mod session; // Session layer - UI state machine, presentation, submission flow
pub mod util; // Utility layer - General types, errors

// Export main types
pub use util::errors::*;
pub use util::types::*;

// Export service layer components
pub use service::{
    config::{AppConfig, ConfigError},
    health::{HealthMonitor, HealthStatus},
    validation::{check_file_size, validate_input},
};

// Export infrastructure components
pub use infrastructure::api::{ClassificationService, ClassifierClient};

// Export session core types
pub use session::{
    controller::{ClassificationOutcome, SubmissionController},
    presentation::{CategoryTone, ConfidenceLevel, ResultView},
    state::{AppModel, CharCount, ErrorBanner, Notice, NoticeKind, SubmitError, ViewState},
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CORE_NAME: &str = "Email Classifier Core";
