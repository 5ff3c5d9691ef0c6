// src/lib.rs
// Public library surface for integration tests (and the boxwatch binary).

pub mod config;
pub mod ledger;
pub mod notify;
pub mod pipeline;
pub mod source;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::ledger::{AlertLedger, LedgerError};
pub use crate::notify::{AlertPayload, Notifier};
pub use crate::pipeline::{run_all, run_cycle, CycleOutcome};
pub use crate::source::{Announcement, Source};
pub use crate::summarize::{
    BackendError, Sleeper, SummarizeError, Summarizer, SummaryBackend, SummaryRequest,
};
