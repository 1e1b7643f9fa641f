//! Core logic for cppflow.
//!
//! This crate discovers test targets from C++ test sources, resolves menu
//! selections, and sequences the clean, configure, build and test steps of a
//! CMake/CTest project.

pub mod catalog;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod runner;
pub mod selection;
pub mod session;

pub use catalog::{NamingConvention, TestCatalog, TestTarget};
pub use command::TopLevelChoice;
pub use config::FlowConfig;
pub use error::FlowError;
pub use pipeline::{Pipeline, PipelineReport, Step, StepReport, StepStatus};
pub use prompt::Prompt;
pub use runner::{Invocation, ProcessExit, ProcessRunner};
pub use selection::Selection;
pub use session::{Answers, Session};
