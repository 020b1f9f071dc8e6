// tcset (timecode setter for the resolve media pool)
// Copyright (C) 2025 Andrew Nissen

use crate::host::{ClipId, ClipStore, FILE_NAME_PROPERTY, START_TC_PROPERTY};
use crate::timecode;

/// Result of processing one clip. The three failure shapes are reported
/// differently but share one failure counter in the summary.
#[derive(Debug, Clone)]
pub enum ClipOutcome {
    /// Timecode extracted and written (or would be, on a dry run).
    Updated {
        name: String,
        token: String,
        timecode: String,
    },
    /// Filename has no `_HHMMSS_` token; the setter was never invoked.
    Skipped { name: String },
    /// The host's setter returned false.
    Rejected { name: String },
    /// A property call failed; `message` is the host's error text.
    Failed { name: String, message: String },
}

impl ClipOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClipOutcome::Updated { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ClipOutcome>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn print_summary(&self) {
        println!("Processing complete:");
        println!(" Success: {}", self.success_count());
        println!(" Failed: {}", self.failed_count());
        println!(" Total: {}", self.total());
    }
}

/// Walk the selection strictly in order, one pass, printing a record per
/// clip as it is processed. Individual failures never stop the batch and
/// a completed write is never rolled back.
pub fn apply(store: &mut dyn ClipStore, clips: &[ClipId], dry_run: bool) -> BatchReport {
    let mut report = BatchReport::default();

    for &clip in clips {
        let outcome = process_clip(store, clip, dry_run);
        print_record(&outcome, dry_run);
        report.outcomes.push(outcome);
    }

    report
}

fn process_clip(store: &mut dyn ClipStore, clip: ClipId, dry_run: bool) -> ClipOutcome {
    let name = match store.clip_property(clip, FILE_NAME_PROPERTY) {
        Ok(name) => name,
        Err(e) => {
            return ClipOutcome::Failed {
                name: format!("clip #{}", clip.0 + 1),
                message: e.to_string(),
            };
        }
    };

    let Some(extracted) = timecode::extract(&name) else {
        return ClipOutcome::Skipped { name };
    };

    if dry_run {
        return ClipOutcome::Updated {
            name,
            token: extracted.token,
            timecode: extracted.timecode,
        };
    }

    match store.set_clip_property(clip, START_TC_PROPERTY, &extracted.timecode) {
        Ok(true) => ClipOutcome::Updated {
            name,
            token: extracted.token,
            timecode: extracted.timecode,
        },
        Ok(false) => ClipOutcome::Rejected { name },
        Err(e) => ClipOutcome::Failed {
            name,
            message: e.to_string(),
        },
    }
}

fn print_record(outcome: &ClipOutcome, dry_run: bool) {
    match outcome {
        ClipOutcome::Updated {
            name,
            token,
            timecode,
        } => {
            if dry_run {
                println!("DRY RUN: {}", name);
            } else {
                println!("SUCCESS: {}", name);
            }
            println!(" Extracted time: {} -> {}", token, timecode);
        }
        ClipOutcome::Skipped { name } => {
            println!("SKIPPED: {}", name);
            println!(" Could not find HH:MM:SS pattern in filename");
        }
        ClipOutcome::Rejected { name } => {
            println!("FAILED: {} - SetClipProperty returned false", name);
        }
        ClipOutcome::Failed { name, message } => {
            println!("ERROR: {} - {}", name, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;
    use std::collections::HashMap;

    struct FakeStore {
        names: Vec<String>,
        rejected: Vec<usize>,
        raising: HashMap<usize, String>,
        set_calls: Vec<(usize, String, String)>,
    }

    impl FakeStore {
        fn new(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|n| n.to_string()).collect(),
                rejected: Vec::new(),
                raising: HashMap::new(),
                set_calls: Vec::new(),
            }
        }

        fn clips(&self) -> Vec<ClipId> {
            (0..self.names.len()).map(ClipId).collect()
        }
    }

    impl ClipStore for FakeStore {
        fn selected_clips(&mut self) -> Result<Vec<ClipId>, HostError> {
            Ok(self.clips())
        }

        fn clip_property(&mut self, clip: ClipId, _name: &str) -> Result<String, HostError> {
            Ok(self.names[clip.0].clone())
        }

        fn set_clip_property(
            &mut self,
            clip: ClipId,
            name: &str,
            value: &str,
        ) -> Result<bool, HostError> {
            if let Some(message) = self.raising.get(&clip.0) {
                return Err(HostError::Call {
                    message: message.clone(),
                });
            }
            self.set_calls
                .push((clip.0, name.to_string(), value.to_string()));
            Ok(!self.rejected.contains(&clip.0))
        }
    }

    #[test]
    fn test_matching_clip_is_updated() {
        let mut store = FakeStore::new(&["VID_20240615_143022_00_001.mp4"]);
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(
            store.set_calls,
            vec![(0, "Start TC".to_string(), "14:30:22:00".to_string())]
        );
    }

    #[test]
    fn test_unmatched_clip_skips_without_calling_setter() {
        let mut store = FakeStore::new(&["clip_final.mov"]);
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.failed_count(), 1);
        assert!(store.set_calls.is_empty());
        assert!(matches!(report.outcomes[0], ClipOutcome::Skipped { .. }));
    }

    #[test]
    fn test_rejected_set_counts_as_failed() {
        let mut store = FakeStore::new(&["VID_20240615_143022_00_001.mp4"]);
        store.rejected.push(0);
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.failed_count(), 1);
        assert!(matches!(report.outcomes[0], ClipOutcome::Rejected { .. }));
    }

    #[test]
    fn test_raised_set_preserves_host_message() {
        let mut store = FakeStore::new(&["VID_20240615_143022_00_001.mp4"]);
        store
            .raising
            .insert(0, "media is offline".to_string());
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.failed_count(), 1);
        match &report.outcomes[0] {
            ClipOutcome::Failed { message, .. } => assert_eq!(message, "media is offline"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_counters_sum_to_total_across_mixed_batch() {
        let mut store = FakeStore::new(&[
            "VID_20240615_143022_00_001.mp4",
            "clip_final.mov",
            "VID_20240615_150000_00_002.mp4",
            "VID_20240616_083015_00_003.mp4",
        ]);
        store.rejected.push(2);
        store.raising.insert(3, "host went away".to_string());
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.total(), 4);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 3);
        assert_eq!(report.success_count() + report.failed_count(), report.total());
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let mut store = FakeStore::new(&["clip_final.mov", "VID_20240615_143022_00_001.mp4"]);
        let clips = store.clips();

        let report = apply(&mut store, &clips, false);

        assert_eq!(report.total(), 2);
        assert!(matches!(report.outcomes[1], ClipOutcome::Updated { .. }));
    }

    #[test]
    fn test_dry_run_never_calls_setter() {
        let mut store = FakeStore::new(&[
            "VID_20240615_143022_00_001.mp4",
            "clip_final.mov",
        ]);
        let clips = store.clips();

        let report = apply(&mut store, &clips, true);

        assert!(store.set_calls.is_empty());
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_empty_selection_produces_empty_report() {
        let mut store = FakeStore::new(&[]);

        let report = apply(&mut store, &[], false);

        assert_eq!(report.total(), 0);
        assert!(store.set_calls.is_empty());
    }
}
