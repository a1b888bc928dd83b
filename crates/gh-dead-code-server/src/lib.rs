//! gh-dead-code HTTP service
//!
//! Two flows over one stateless HTTP surface:
//!
//! - **analyze**: open a repository through the analysis engine and report
//!   its unused functions and classes
//! - **create-pr**: analyze, then land the removal on a fresh branch and
//!   open a pull request for it
//!
//! ```text
//! routes ──► AnalysisInvoker ──► RepositoryAnalyzer (engine)
//!    │
//!    └─────► PrWorkflowDriver ──► VersionControlHost (GitHub)
//!                   │
//!                   └──► removal (span deletion)
//! ```

pub mod analysis;
pub mod error;
pub mod logger;
pub mod pr_workflow;
pub mod removal;
pub mod routes;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::AnalysisInvoker;
pub use error::ServiceError;
pub use pr_workflow::{BranchNamer, PrWorkflowDriver, WorkflowSettings};
pub use routes::{router, AppState};
