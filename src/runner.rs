use crate::config::ScrapeConfig;
use crate::enumerator;
use crate::exporter::{self, ExportError};
use crate::extractor::{Extractor, JobRecord};
use crate::page::PageDriver;
use crate::postprocess;
use crate::wait;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// Zero cards found, or every extraction came back fully empty. The run
    /// ends without an artifact but the process is not expected to die.
    #[error("no job data found on the page")]
    EmptyResult,
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Records handed to the export sink.
    pub count: usize,
    /// Per-record notes for items that produced no detail fields.
    pub errors: Vec<String>,
}

/// The run controller. Three states: enumerating, extracting (looping),
/// exporting — with a short-circuit to done when the page yields nothing.
/// Strictly sequential: each card is clicked, settled and read to completion
/// before the next one, because overlapping clicks would corrupt the reads.
pub struct Runner {
    config: ScrapeConfig,
    stop: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(config: ScrapeConfig) -> Self {
        Runner {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag another thread can set to stop the run after the in-flight
    /// extraction completes. There is no mid-wait abort.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn run(&self, page: &mut dyn PageDriver) -> Result<RunSummary, RunError> {
        let handles = enumerator::enumerate(page, &self.config.selectors.card);
        if handles.is_empty() {
            return Err(RunError::EmptyResult);
        }

        let cap = self.config.max_items.unwrap_or(handles.len());
        if cap < handles.len() {
            info!("Capping run at {} of {} cards", cap, handles.len());
        }

        let extractor = Extractor::new(&self.config);
        let mut batch: Vec<JobRecord> = Vec::new();
        let mut errors = Vec::new();

        for (i, handle) in handles.iter().take(cap).enumerate() {
            if self.stop.load(Ordering::Relaxed) {
                info!("Stop requested; finishing after {} items", batch.len());
                break;
            }
            info!("Fetching item {} / {}", i + 1, cap.min(handles.len()));
            if i > 0 {
                if let Some([min_ms, max_ms]) = self.config.item_delay_ms {
                    wait::item_delay(min_ms, max_ms);
                }
            }

            let record = extractor.extract(page, handle);
            if record.title.is_empty() && record.company.is_empty() && record.description.is_empty()
            {
                errors.push(format!("item {}: no detail fields rendered", i + 1));
            }
            batch.push(record);
        }

        if batch.is_empty() || batch.iter().all(JobRecord::is_empty) {
            return Err(RunError::EmptyResult);
        }

        if self.config.dry_run {
            info!("Dry run: skipping export of {} records", batch.len());
            println!("{}", exporter::render(&batch)?);
        } else {
            exporter::export(&batch, &self.config.output_path)?;
            if let Some(dir) = &self.config.jobs_dir {
                postprocess::write_job_files(&batch, dir, chrono::Local::now().date_naive());
            }
        }

        for note in &errors {
            warn!("{}", note);
        }
        Ok(RunSummary {
            count: batch.len(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selectors;
    use crate::page::{ScriptedCard, ScriptedPage};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn temp_out(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("jobcard_runner_{}_{}", std::process::id(), name))
    }

    fn test_config(output: PathBuf) -> ScrapeConfig {
        ScrapeConfig {
            output_path: output,
            settle_ms: 20,
            poll_ms: 1,
            max_items: None,
            ..ScrapeConfig::default()
        }
    }

    fn card(title: &str, company: &str, description: &str, link: &str, age: &str) -> ScriptedCard {
        let selectors = Selectors::default();
        let mut fields = HashMap::new();
        fields.insert(selectors.title, title.to_string());
        fields.insert(selectors.company, company.to_string());
        fields.insert(selectors.description, description.to_string());
        ScriptedCard {
            id: String::new(),
            link: link.to_string(),
            fields,
            age: if age.is_empty() {
                None
            } else {
                Some(age.to_string())
            },
        }
    }

    #[test]
    fn n_handles_yield_n_records_in_order() {
        let out = temp_out("order.json");
        let mut page = ScriptedPage::new(vec![
            card("A", "CoA", "da", "https://x/a", "1d"),
            card("B", "CoB", "db", "https://x/b", "2d"),
            card("C", "CoC", "dc", "https://x/c", "3d"),
        ]);
        let runner = Runner::new(test_config(out.clone()));

        let summary = runner.run(&mut page).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(page.clicks, vec![0, 1, 2]);

        let parsed: Vec<JobRecord> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].title, "A");
        assert_eq!(parsed[1].title, "B");
        assert_eq!(parsed[2].title, "C");
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn zero_handles_short_circuits_without_export() {
        let out = temp_out("zero.json");
        let mut page = ScriptedPage::new(Vec::new());
        let runner = Runner::new(test_config(out.clone()));

        let result = runner.run(&mut page);
        assert!(matches!(result, Err(RunError::EmptyResult)));
        assert!(!out.exists());
    }

    #[test]
    fn max_items_takes_the_first_k_in_document_order() {
        let out = temp_out("cap.json");
        let mut page = ScriptedPage::new(vec![
            card("A", "CoA", "da", "https://x/a", "1d"),
            card("B", "CoB", "db", "https://x/b", "2d"),
            card("C", "CoC", "dc", "https://x/c", "3d"),
        ]);
        let mut config = test_config(out.clone());
        config.max_items = Some(2);
        let runner = Runner::new(config);

        let summary = runner.run(&mut page).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(page.clicks, vec![0, 1]);
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn partial_failures_produce_partial_records_in_place() {
        // Card 2 has no description, card 3 has no age badge.
        let out = temp_out("partial.json");
        let mut page = ScriptedPage::new(vec![
            card("A", "CoA", "da", "https://x/a", "1d"),
            card("B", "CoB", "", "https://x/b", "2d"),
            card("C", "CoC", "dc", "https://x/c", ""),
        ]);
        let runner = Runner::new(test_config(out.clone()));

        let summary = runner.run(&mut page).unwrap();
        assert_eq!(summary.count, 3);

        let parsed: Vec<JobRecord> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed[1].description, "");
        assert_eq!(parsed[1].company, "CoB");
        assert_eq!(parsed[2].age, "");
        assert_eq!(parsed[2].title, "C");
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn all_empty_extractions_report_empty_result() {
        let out = temp_out("allempty.json");
        let mut page = ScriptedPage::new(vec![ScriptedCard::default(), ScriptedCard::default()]);
        let runner = Runner::new(test_config(out.clone()));

        let result = runner.run(&mut page);
        assert!(matches!(result, Err(RunError::EmptyResult)));
        assert!(!out.exists());
    }

    #[test]
    fn stop_flag_halts_before_the_next_extraction() {
        let out = temp_out("stop.json");
        let mut page = ScriptedPage::new(vec![
            card("A", "CoA", "da", "https://x/a", "1d"),
            card("B", "CoB", "db", "https://x/b", "2d"),
        ]);
        let runner = Runner::new(test_config(out.clone()));
        runner.stop_handle().store(true, Ordering::Relaxed);

        // Stop was requested before the first card, so nothing is extracted.
        let result = runner.run(&mut page);
        assert!(matches!(result, Err(RunError::EmptyResult)));
        assert!(page.clicks.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn dry_run_writes_no_file() {
        let out = temp_out("dry.json");
        let mut page = ScriptedPage::new(vec![card("A", "CoA", "da", "https://x/a", "1d")]);
        let mut config = test_config(out.clone());
        config.dry_run = true;
        let runner = Runner::new(config);

        let summary = runner.run(&mut page).unwrap();
        assert_eq!(summary.count, 1);
        assert!(!out.exists());
    }
}
