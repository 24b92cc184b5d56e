pub mod acquire;
pub mod config;
pub mod detect;
pub mod error;
pub mod exclude;
pub mod merge;
pub mod pipeline;
pub mod walk;

pub use acquire::{Checkout, RepoSource, acquire};
pub use config::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_OUTPUT_FILENAME, MergeConfig, get_builtin_denylist,
};
pub use error::{AppError, Result};
pub use exclude::{ExcludeReason, evaluate};
pub use merge::{MergeResult, MergeWriter};
pub use pipeline::{Summary, run};
pub use walk::{CandidateFile, WalkResult, walk_repository};
