use crate::error::StatisticsError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const RESULT_HEADERS: [&str; 6] = [
    "target_path",
    "benchmark_cycles",
    "average_run",
    "fastest_run",
    "slowest_run",
    "relative_fps",
];

const PRECISION: i32 = 2;

/// Summary of every cycle run against one target. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub target_path: PathBuf,
    pub benchmark_cycles: u32,
    pub average_run: f64,
    pub fastest_run: f64,
    pub slowest_run: f64,
    pub relative_fps: f64,
}

impl RunRecord {
    /// Derives the record from raw cycle durations.
    ///
    /// `relative_fps` is frames processed across all cycles over the raw total
    /// wall time; only the final values are rounded.
    pub fn from_durations(
        target_path: PathBuf,
        frame_total: u64,
        durations: &[Duration],
    ) -> Result<Self, StatisticsError> {
        if durations.is_empty() {
            return Err(StatisticsError::NoSamples);
        }

        let seconds: Vec<f64> = durations.iter().map(Duration::as_secs_f64).collect();
        let cycles = seconds.len();
        let total: f64 = seconds.iter().sum();
        let degenerate = || StatisticsError::DegenerateTiming {
            cycles,
            total_secs: total,
        };
        if !(total.is_finite() && total > 0.0) {
            return Err(degenerate());
        }

        let relative_fps = frame_total as f64 * cycles as f64 / total;
        if !relative_fps.is_finite() {
            return Err(degenerate());
        }

        let fastest = seconds.iter().copied().fold(f64::INFINITY, f64::min);
        let slowest = seconds.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            target_path,
            benchmark_cycles: cycles as u32,
            average_run: round(total / cycles as f64),
            fastest_run: round(fastest),
            slowest_run: round(slowest),
            relative_fps: round(relative_fps),
        })
    }
}

fn round(value: f64) -> f64 {
    let factor = 10f64.powi(PRECISION);
    (value * factor).round() / factor
}

/// Ordered run records of one benchmark batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    records: Vec<RunRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn rows(&self) -> Vec<[String; 6]> {
        self.records
            .iter()
            .map(|record| {
                [
                    record.target_path.display().to_string(),
                    record.benchmark_cycles.to_string(),
                    format!("{:.2}", record.average_run),
                    format!("{:.2}", record.fastest_run),
                    format!("{:.2}", record.slowest_run),
                    format!("{:.2}", record.relative_fps),
                ]
            })
            .collect()
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let mut widths = RESULT_HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let header: Vec<String> = RESULT_HEADERS
            .iter()
            .zip(&widths)
            .map(|(name, width)| format!("{:<width$}", name, width = width))
            .collect();
        writeln!(f, "{}", header.join("  ").trim_end())?;
        writeln!(f, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)))?;

        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(index, (cell, width))| {
                    if index == 0 {
                        format!("{:<width$}", cell, width = width)
                    } else {
                        format!("{:>width$}", cell, width = width)
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("  "))?;
        }
        Ok(())
    }
}
