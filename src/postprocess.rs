use crate::extractor::JobRecord;
use chrono::{Duration, NaiveDate};
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Per-job output file, one per record that carries a jobListingId. Downstream
/// tooling keys on the id, so records without one are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_id: String,
    pub url: String,
    pub company: String,
    pub title: String,
    pub description: String,
    /// ISO date resolved from the listing age, or empty when unresolvable.
    pub posted_date: String,
}

/// Pull the `jobListingId` query parameter out of a card link.
pub fn extract_job_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "jobListingId")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Resolve a free-text listing age ("3d", "15h") to the date it was posted,
/// relative to `today`. Unexpected formats resolve to `None`.
pub fn resolve_posted_date(age: &str, today: NaiveDate) -> Option<NaiveDate> {
    let pattern = Regex::new(r"^(\d+)\s*([dh])").unwrap();
    let captures = pattern.captures(age.trim())?;
    let amount: i64 = captures[1].parse().ok()?;
    match &captures[2] {
        "d" => today.checked_sub_signed(Duration::days(amount)),
        "h" => {
            // Hours are coarser than a day; anything under 24h counts as today.
            today.checked_sub_signed(Duration::days(amount / 24))
        }
        _ => None,
    }
}

/// Write one `<job_id>.json` per identifiable record into `dir`. Returns the
/// number written; every failure is logged and skipped, never fatal, since
/// the flat export has already succeeded by the time this runs.
pub fn write_job_files(batch: &[JobRecord], dir: &Path, today: NaiveDate) -> usize {
    if let Err(e) = fs::create_dir_all(dir) {
        warn!("Could not create jobs directory {:?}: {}", dir, e);
        return 0;
    }

    let mut written = 0;
    for record in batch {
        let job_id = match extract_job_id(&record.link) {
            Some(id) => id,
            None => {
                info!("Skipping job '{}' because it has no jobListingId", record.title);
                continue;
            }
        };
        let posted_date = resolve_posted_date(&record.age, today)
            .map(|date| date.to_string())
            .unwrap_or_default();
        let job = JobDescription {
            job_id: job_id.clone(),
            url: record.link.clone(),
            company: record.company.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            posted_date,
        };

        let path = dir.join(format!("{}.json", job_id));
        let json = match serde_json::to_string_pretty(&job) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize job {}: {}", job_id, e);
                continue;
            }
        };
        match fs::write(&path, json) {
            Ok(()) => written += 1,
            Err(e) => warn!("Could not write {:?}: {}", path, e),
        }
    }
    info!("Wrote {} per-job files to {:?}", written, dir);
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_comes_from_the_query_string() {
        let link = "https://www.glassdoor.com/job-listing/?pos=101&jobListingId=100876543&src=GD";
        assert_eq!(extract_job_id(link), Some("100876543".to_string()));
    }

    #[test]
    fn links_without_an_id_yield_none() {
        assert_eq!(extract_job_id("https://example.com/job?pos=3"), None);
        assert_eq!(extract_job_id(""), None);
        assert_eq!(extract_job_id("not a url"), None);
    }

    #[test]
    fn day_ages_resolve_to_past_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            resolve_posted_date("3d", today),
            NaiveDate::from_ymd_opt(2026, 8, 27)
        );
        assert_eq!(resolve_posted_date("30d+", today), NaiveDate::from_ymd_opt(2026, 7, 31));
    }

    #[test]
    fn hour_ages_round_down_to_days() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(resolve_posted_date("15h", today), Some(today));
        assert_eq!(
            resolve_posted_date("26h", today),
            NaiveDate::from_ymd_opt(2026, 8, 29)
        );
    }

    #[test]
    fn junk_ages_resolve_to_none() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(resolve_posted_date("", today), None);
        assert_eq!(resolve_posted_date("Easy Apply", today), None);
        assert_eq!(resolve_posted_date("d3", today), None);
    }

    #[test]
    fn writes_only_identifiable_records() {
        let dir = std::env::temp_dir().join(format!("jobcard_jobs_{}", std::process::id()));
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let batch = vec![
            JobRecord {
                title: "Rust Engineer".to_string(),
                company: "Acme".to_string(),
                description: "Build things.".to_string(),
                link: "https://example.com/job?jobListingId=42".to_string(),
                age: "2d".to_string(),
            },
            JobRecord {
                title: "No Id".to_string(),
                link: "https://example.com/job".to_string(),
                ..JobRecord::default()
            },
        ];

        let written = write_job_files(&batch, &dir, today);
        assert_eq!(written, 1);
        let content = fs::read_to_string(dir.join("42.json")).unwrap();
        let job: JobDescription = serde_json::from_str(&content).unwrap();
        assert_eq!(job.job_id, "42");
        assert_eq!(job.posted_date, "2026-08-28");
        fs::remove_dir_all(&dir).ok();
    }
}
