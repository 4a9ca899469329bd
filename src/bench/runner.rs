//! Suite runner
//!
//! Runs the selected cases one after another on the calling thread and
//! prints one line per case. The async entry points move the whole suite
//! onto tokio's blocking pool; nothing inside a run is parallel.

use chrono::Utc;
use std::hint::black_box;
use std::io::Write;
use tracing::{debug, info};

use super::cases::{self, BenchCase, Section};
use super::harness::{TimingHarness, TimingPolicy};
use super::report::{self, CaseResult, SuiteReport};
use crate::accel::CpuCapabilities;
use crate::core::{BenchConfig, BenchError, BenchResult};
use crate::vectors::LaneWidths;
use crate::workload::Workload;

pub struct SuiteRunner {
    config: BenchConfig,
    filter: Option<String>,
}

impl SuiteRunner {
    pub fn new(config: BenchConfig) -> Self {
        Self { config, filter: None }
    }

    /// Only run cases whose name contains `filter` (case-insensitive).
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn selected_cases(&self) -> BenchResult<Vec<&'static BenchCase>> {
        let selected = cases::select(self.filter.as_deref());
        if selected.is_empty() {
            let filter = self.filter.clone().unwrap_or_default();
            return Err(BenchError::NoMatchingCase(filter));
        }
        Ok(selected)
    }

    /// Run every selected case, writing the console report to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> BenchResult<SuiteReport> {
        self.config.validate()?;
        let selected = self.selected_cases()?;

        let started_at = Utc::now();
        let lanes = LaneWidths::current();
        let cpu = CpuCapabilities::detect();
        info!(
            cases = selected.len(),
            array_size = self.config.array_size,
            simd_bits = cpu.simd_register_bits(),
            "Starting vector benchmark suite"
        );

        let mut workload = Workload::new(&self.config)?;
        let harness = TimingHarness::new(TimingPolicy::from(&self.config));
        let width = report::name_width(&selected);

        writeln!(out, "{}", report::header_line(&lanes))?;
        writeln!(out, "{}", report::SUITE_SEPARATOR)?;

        let mut results = Vec::with_capacity(selected.len());
        let mut section: Option<Section> = None;

        for case in selected {
            if section.is_some_and(|s| s != case.section) {
                writeln!(out, "{}", report::SECTION_SEPARATOR)?;
            }
            section = Some(case.section);

            let run = case.run;
            let m = harness.measure(|| run(black_box(&mut workload)));
            debug!(
                case = case.name,
                loops = m.loops,
                passes = m.passes,
                elapsed_ms = m.elapsed.as_millis() as u64,
                "Case measured"
            );
            if m.reached_ceiling(harness.policy()) && m.elapsed < harness.policy().min_duration {
                debug!(case = case.name, "Loop ceiling reached before the time floor");
            }

            writeln!(out, "{}", report::case_line(case.name, width, &m))?;
            out.flush()?;
            results.push(CaseResult::new(case, &m));

            harness.settle();
        }

        writeln!(out, "{}", report::SUITE_SEPARATOR)?;
        out.flush()?;

        let finished_at = Utc::now();
        info!(
            duration_secs = (finished_at - started_at).num_seconds(),
            "Benchmark suite complete"
        );

        Ok(SuiteReport {
            started_at,
            finished_at,
            lanes,
            cpu,
            config: self.config.clone(),
            results,
        })
    }

    /// Run on the blocking pool, printing to stdout.
    pub async fn run_async(self) -> BenchResult<SuiteReport> {
        tokio::task::spawn_blocking(move || {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            self.run(&mut out)
        })
        .await?
    }
}

/// Run every case with the default configuration, printing to stdout.
pub fn run_all() -> BenchResult<SuiteReport> {
    let runner = SuiteRunner::new(BenchConfig::default());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runner.run(&mut out)
}

/// Awaitable form of [`run_all`]; completes when the last case finishes.
pub async fn run_all_async() -> BenchResult<SuiteReport> {
    SuiteRunner::new(BenchConfig::default()).run_async().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> BenchConfig {
        BenchConfig {
            array_size: 16,
            initial_loops: 4,
            max_loops: 16,
            min_duration_secs: 0.0,
            pause_ms: 0,
            start_delay_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_console_layout() {
        let runner = SuiteRunner::new(quick_config());
        let mut out = Vec::new();
        let report = runner.run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("HwVector has "));
        assert_eq!(lines[1], "==");
        assert_eq!(*lines.last().unwrap(), "==");
        assert_eq!(lines.iter().filter(|l| **l == "--").count(), 3);

        // header, 2x "==", 3x "--", one line per case
        assert_eq!(lines.len(), 6 + cases::CASES.len());
        assert_eq!(report.results.len(), cases::CASES.len());

        let width = "NaVector4Scale".len();
        assert!(lines[2].starts_with("    MyVecScale = "));
        assert!(lines[2].ends_with("(4 loops)"));
        for line in lines.iter().filter(|l| l.contains(" = ")) {
            assert_eq!(line.find(" = "), Some(width), "misaligned: {}", line);
        }
    }

    #[test]
    fn test_loop_counts_respect_ceiling() {
        let config = BenchConfig {
            min_duration_secs: 10.0,
            ..quick_config()
        };
        let runner = SuiteRunner::new(config).with_filter("2dadd");
        let report = runner.run(&mut std::io::sink()).unwrap();
        assert_eq!(report.results.len(), 3);
        assert!(report.results.iter().all(|r| r.loops == 16));
    }

    #[test]
    fn test_oversized_time_floor_rejected() {
        let config = BenchConfig { min_duration_secs: 1e20, ..quick_config() };
        let runner = SuiteRunner::new(config).with_filter("ArrayAdd");
        let err = runner.run(&mut std::io::sink()).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_accessor() {
        let runner = SuiteRunner::new(quick_config());
        assert_eq!(runner.config(), &quick_config());
    }

    #[test]
    fn test_filter_without_match() {
        let runner = SuiteRunner::new(quick_config()).with_filter("Quaternion");
        let err = runner.run(&mut std::io::sink()).unwrap_err();
        assert!(matches!(err, BenchError::NoMatchingCase(_)));
    }

    #[test]
    fn test_single_section_has_no_section_separator() {
        let runner = SuiteRunner::new(quick_config()).with_filter("Norm");
        let mut out = Vec::new();
        runner.run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.lines().any(|l| l == "--"));
        assert_eq!(text.lines().count(), 3 + 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BenchConfig { initial_loops: 0, ..quick_config() };
        let err = SuiteRunner::new(config).run(&mut std::io::sink()).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_run_async_completes() {
        let runner = SuiteRunner::new(quick_config()).with_filter("ArrayAdd");
        let report = runner.run_async().await.unwrap();
        assert_eq!(report.results.len(), 2);
        assert!(report.finished_at >= report.started_at);
    }
}
