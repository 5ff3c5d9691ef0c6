// src/pipeline.rs
//! The alert pipeline: fetch -> dedup-check -> summarize -> notify -> record.
//!
//! Each source runs one cycle per process invocation. Cycles are independent:
//! a failure in one source is logged and never stops the others. The ledger
//! is only updated after a summary was produced, so a failed summarization is
//! retried on the next run.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ledger::AlertLedger;
use crate::notify::{AlertPayload, Notifier};
use crate::source::Source;
use crate::summarize::{Summarizer, SummaryBackend, SummaryRequest};

/// How a cycle ended when it did not fail. Notifier trouble is carried here
/// as a warning rather than swallowed, so callers and tests can assert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The source had no qualifying announcement. Not an error.
    NoNewPost,
    /// The announcement was already alerted on. Not an error.
    Duplicate,
    /// Summary produced and the URL recorded. `notify_warning` holds the
    /// notifier's error message when best-effort delivery failed.
    Alerted { notify_warning: Option<String> },
}

/// One check cycle for one source.
pub async fn run_cycle<B: SummaryBackend>(
    source: &dyn Source,
    ledger: &AlertLedger,
    summarizer: &Summarizer<B>,
    notifier: Option<&dyn Notifier>,
) -> Result<CycleOutcome> {
    let post = source
        .latest()
        .await
        .with_context(|| format!("fetching latest post from {}", source.name()))?;
    let Some(post) = post else {
        tracing::info!(source = source.name(), "no qualifying post found");
        return Ok(CycleOutcome::NoNewPost);
    };

    if ledger.exists(&post.url)? {
        tracing::info!(source = source.name(), url = %post.url, "duplicate post, already alerted");
        return Ok(CycleOutcome::Duplicate);
    }

    let request = SummaryRequest {
        source: post.source.clone(),
        url: post.url.clone(),
        body: post.body.clone(),
    };
    // Summarize failure aborts here, before the ledger is touched.
    let summary = summarizer.summarize(&request).await?;
    tracing::info!(source = source.name(), url = %post.url, %summary, "summary produced");

    let mut notify_warning = None;
    if let Some(notifier) = notifier {
        let payload = AlertPayload {
            message: summary,
            link: post.url.clone(),
        };
        if let Err(e) = notifier.send(&payload).await {
            tracing::warn!(
                source = source.name(),
                notifier = notifier.name(),
                error = %e,
                "notification failed, recording anyway"
            );
            notify_warning = Some(e.to_string());
        }
    }

    ledger.record_if_absent(&post.url)?;
    Ok(CycleOutcome::Alerted { notify_warning })
}

/// Run every source's cycle sequentially, each against its own ledger file
/// under `ledger_dir`. Returns the number of failed cycles; failures are
/// logged here and do not affect the process exit status.
pub async fn run_all<B: SummaryBackend>(
    sources: &[Box<dyn Source>],
    ledger_dir: &Path,
    summarizer: &Summarizer<B>,
    notifier: Option<&dyn Notifier>,
) -> usize {
    let mut failures = 0;
    for source in sources {
        let ledger = AlertLedger::new(ledger_dir, source.name());
        match run_cycle(source.as_ref(), &ledger, summarizer, notifier).await {
            Ok(outcome) => {
                tracing::info!(source = source.name(), ?outcome, "cycle finished");
            }
            Err(e) => {
                failures += 1;
                tracing::error!(source = source.name(), error = ?e, "cycle failed");
            }
        }
    }
    failures
}
