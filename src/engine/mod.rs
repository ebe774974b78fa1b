//! Execution engine for kollect pipelines

pub mod conditions;
pub mod executor;

pub use executor::{
    execute_pipeline, explain_pipeline, lookup_stage, ExecutionContext, ExecutionResult,
    ResultData, StageInfo, STAGES,
};
