//! CSV output and console summary for simulation rows.

use anyhow::{Context, Result};
use colored::Colorize;
use lorebound_game::SnapshotRow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column contract consumed by the downstream analysis tooling. Must stay
/// in sync with [`SnapshotRow`]; do not reorder.
pub const CSV_HEADER: &str =
    "run_id,hour,level,xp,ip,player_power_score,total_gear_score,might,finesse,wits,grit,presence";

/// Write all rows to `path` as CSV, header first.
pub fn write_csv(path: &Path, rows: &[SnapshotRow]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            row.run_id,
            row.hour,
            row.level,
            row.xp,
            row.ip,
            row.player_power_score,
            row.total_gear_score,
            row.might,
            row.finesse,
            row.wits,
            row.grit,
            row.presence,
        )?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Final snapshot of each run, in run order.
#[must_use]
pub fn final_rows(rows: &[SnapshotRow]) -> Vec<&SnapshotRow> {
    let mut finals: Vec<&SnapshotRow> = Vec::new();
    for row in rows {
        match finals.last() {
            Some(last) if last.run_id == row.run_id => {
                *finals.last_mut().expect("non-empty") = row;
            }
            _ => finals.push(row),
        }
    }
    finals
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    values.iter().sum::<f64>() / count
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    variance.sqrt()
}

/// Print the cross-run progression summary to stdout.
pub fn print_summary(rows: &[SnapshotRow], archetype_label: &str, total_hours: f64) {
    println!();
    println!("{}", "📈 Progression Summary".bright_cyan().bold());
    println!("{}", "======================".cyan());

    let finals = final_rows(rows);
    if finals.is_empty() {
        println!("No rows produced.");
        return;
    }

    let levels: Vec<f64> = finals.iter().map(|r| f64::from(r.level)).collect();
    let powers: Vec<f64> = finals.iter().map(|r| r.player_power_score).collect();
    #[allow(clippy::cast_precision_loss)]
    let gear: Vec<f64> = finals.iter().map(|r| r.total_gear_score as f64).collect();

    let level_mean = mean(&levels);
    let power_mean = mean(&powers);

    println!("Archetype: {}", archetype_label.bold());
    println!("Runs: {} · Hours per run: {}", finals.len(), total_hours);
    println!("Rows: {}", rows.len());
    println!(
        "Final level: mean {:.1} ± {:.1}",
        level_mean,
        std_dev(&levels, level_mean)
    );
    println!(
        "Final power: mean {:.1} ± {:.1}",
        power_mean,
        std_dev(&powers, power_mean)
    );
    println!("Final gear score: mean {:.1}", mean(&gear));
}
