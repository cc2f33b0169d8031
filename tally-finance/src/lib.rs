//! tally-finance: category rules, sample ledger, and the statement → ledger pipeline

pub mod category_rules;
pub mod pipeline;
pub mod sample;

pub use category_rules::{categorize, categorize_table, matching_rule, CategoryRule, Trigger};
pub use pipeline::{
    finalize, stage_ledger, LedgerPipeline, LedgerSource, PipelineOptions, PipelineOutput,
    RejectedRow, DEFAULT_STATEMENT,
};
pub use sample::sample_ledger;
