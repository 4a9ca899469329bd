//! Console lines and the structured suite report

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::cases::{BenchCase, Section};
use super::harness::Measurement;
use crate::accel::CpuCapabilities;
use crate::core::{BenchConfig, BenchResult};
use crate::vectors::LaneWidths;

pub const SUITE_SEPARATOR: &str = "==";
pub const SECTION_SEPARATOR: &str = "--";

pub fn header_line(lanes: &LaneWidths) -> String {
    format!(
        "HwVector has {} floats, or {} doubles, or {} ints",
        lanes.floats, lanes.doubles, lanes.ints
    )
}

/// `<right-aligned name> = <seconds, 9 decimals> (<loops> loops)`
pub fn case_line(name: &str, width: usize, m: &Measurement) -> String {
    format!(
        "{:>width$} = {:.9} ({} loops)",
        name,
        m.seconds_per_iteration(),
        m.loops,
        width = width
    )
}

/// Label width that right-aligns every name in `cases`.
pub fn name_width(cases: &[&BenchCase]) -> usize {
    cases.iter().map(|c| c.name.len()).max().unwrap_or(0)
}

/// Timing of one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: &'static str,
    pub section: Section,
    pub loops: u64,
    pub elapsed_secs: f64,
    pub seconds_per_iteration: f64,
    pub passes: u32,
}

impl CaseResult {
    pub fn new(case: &BenchCase, m: &Measurement) -> Self {
        Self {
            name: case.name,
            section: case.section,
            loops: m.loops,
            elapsed_secs: m.elapsed.as_secs_f64(),
            seconds_per_iteration: m.seconds_per_iteration(),
            passes: m.passes,
        }
    }
}

/// Everything one suite run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub lanes: LaneWidths,
    pub cpu: CpuCapabilities,
    pub config: BenchConfig,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    /// Fastest case of each section.
    pub fn fastest_per_section(&self) -> Vec<&CaseResult> {
        let mut best: Vec<&CaseResult> = Vec::new();
        for r in &self.results {
            match best.iter().position(|b| b.section == r.section) {
                Some(i) if r.seconds_per_iteration < best[i].seconds_per_iteration => best[i] = r,
                Some(_) => {}
                None => best.push(r),
            }
        }
        best
    }

    pub fn write_json<W: Write>(&self, out: W) -> BenchResult<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }

    pub fn save_json(&self, path: &Path) -> BenchResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_json(std::io::BufWriter::new(file))
    }
}
