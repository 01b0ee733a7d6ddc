//! Batch extraction
//!
//! Runs the engine over many stored responses. Each job carries its own
//! immutable snapshot of the project (brand, competitors, source URLs), so
//! jobs share nothing and run concurrently on the blocking thread pool.
//! A job with invalid input is recorded as a failure; the rest complete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use citelens_core::{
    AppConfig, BatchConfig, CitelensError, Entity, ProjectExtraction, Result,
};

use crate::orchestrator::ExtractionOrchestrator;
use crate::summary::ExtractionSummary;

/// One stored response to analyze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub response_id: String,
    pub text: String,
    pub brand: Entity,
    #[serde(default)]
    pub competitors: Vec<Entity>,
    #[serde(default)]
    pub citation_urls: Vec<String>,
}

/// Parse jobs from JSON Lines, skipping blank lines
pub fn parse_jobs_jsonl(content: &str) -> Result<Vec<BatchJob>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| CitelensError::InvalidInput(format!("line {}: {e}", n + 1)))
        })
        .collect()
}

/// Extraction for one successful job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub response_id: String,
    pub extraction: ProjectExtraction,
}

/// A job that could not be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub response_id: String,
    pub error: String,
}

/// Outcome of a batch run, in job input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<BatchResult>,
    pub failures: Vec<BatchFailure>,
    pub summary: ExtractionSummary,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Per-invocation batch driver
#[derive(Debug, Clone)]
pub struct BatchRunner {
    orchestrator: Arc<ExtractionOrchestrator>,
    concurrency: usize,
}

impl BatchRunner {
    /// Create a runner sharing an orchestrator
    pub fn new(orchestrator: Arc<ExtractionOrchestrator>, config: &BatchConfig) -> Self {
        Self {
            orchestrator,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Create a runner and its orchestrator from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let orchestrator = ExtractionOrchestrator::from_config(&config.extraction)?;
        Ok(Self::new(Arc::new(orchestrator), &config.batch))
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Analyze every job and collect the results
    pub async fn run(&self, jobs: Vec<BatchJob>) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            "Batch {} started: {} responses, concurrency {}",
            run_id,
            jobs.len(),
            self.concurrency
        );

        let mut outcomes: Vec<(usize, String, Result<ProjectExtraction>)> =
            stream::iter(jobs.into_iter().enumerate())
                .map(|(ordinal, job)| {
                    let orchestrator = Arc::clone(&self.orchestrator);
                    async move {
                        let response_id = job.response_id.clone();
                        let outcome = tokio::task::spawn_blocking(move || {
                            orchestrator.extract_project(
                                &job.text,
                                &job.brand,
                                &job.competitors,
                                &job.citation_urls,
                            )
                        })
                        .await
                        .map_err(|e| CitelensError::Other(anyhow::Error::new(e)))
                        .and_then(std::convert::identity);
                        (ordinal, response_id, outcome)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        outcomes.sort_by_key(|(ordinal, _, _)| *ordinal);

        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut summary = ExtractionSummary::default();

        for (_, response_id, outcome) in outcomes {
            match outcome {
                Ok(extraction) => {
                    summary.add(&extraction);
                    results.push(BatchResult {
                        response_id,
                        extraction,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping response {}: {}", response_id, e);
                    failures.push(BatchFailure {
                        response_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        let finished_at = Utc::now();
        tracing::info!(
            "Batch {} finished: {} succeeded, {} failed",
            run_id,
            results.len(),
            failures.len()
        );

        BatchReport {
            run_id,
            started_at,
            finished_at,
            results,
            failures,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, text: &str, brand: &str) -> BatchJob {
        BatchJob {
            response_id: id.to_string(),
            text: text.to_string(),
            brand: Entity::brand(brand),
            competitors: vec![Entity::competitor("Globex")],
            citation_urls: vec!["https://acme.com".to_string()],
        }
    }

    fn runner(concurrency: usize) -> BatchRunner {
        BatchRunner::new(
            Arc::new(ExtractionOrchestrator::new().unwrap()),
            &BatchConfig { concurrency },
        )
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let jobs: Vec<BatchJob> = (0..20)
            .map(|i| job(&format!("r{i}"), "Acme is great. Globex is fine", "Acme"))
            .collect();

        let report = runner(4).run(jobs).await;

        assert_eq!(report.processed(), 20);
        assert!(report.failures.is_empty());
        let ids: Vec<String> = report.results.iter().map(|r| r.response_id.clone()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(report.summary.responses, 20);
        assert_eq!(report.summary.total_mentions, 40);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_invalid_job_is_skipped() {
        let jobs = vec![
            job("ok-1", "Acme is great", "Acme"),
            job("bad", "Acme is great", "   "),
            job("ok-2", "Globex is fine", "Acme"),
        ];

        let report = runner(2).run(jobs).await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].response_id, "bad");
        assert!(report.failures[0].error.contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = runner(1).run(Vec::new()).await;
        assert_eq!(report.processed(), 0);
        assert_eq!(report.summary.responses, 0);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        assert_eq!(runner(0).concurrency(), 1);
    }

    #[test]
    fn test_parse_jobs_jsonl() {
        let content = r#"{"response_id": "r1", "text": "Acme rocks", "brand": {"name": "Acme", "kind": "brand"}}
{"response_id": "r2", "text": "x", "brand": {"name": "Acme", "kind": "brand"}, "competitors": [{"name": "Globex", "kind": "competitor", "id": "c-1"}], "citation_urls": ["https://a.com"]}
"#;
        let jobs = parse_jobs_jsonl(content).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs[0].competitors.is_empty());
        assert_eq!(jobs[1].competitors[0].id.as_deref(), Some("c-1"));

        assert!(parse_jobs_jsonl("not json").is_err());
    }

    #[test]
    fn test_run_with_block_on() {
        let report = tokio_test::block_on(runner(1).run(vec![job("r", "Acme", "Acme")]));
        assert_eq!(report.results.len(), 1);
    }
}
