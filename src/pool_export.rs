use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::pool::{WeekPool, regional_pool};
use crate::season::Season;

pub struct ExportReport {
    pub weeks: usize,
    pub rows: usize,
}

/// Write the week-by-week pool simulation to a workbook, one worksheet
/// per simulated week.
pub fn export_pool(path: &Path, season: &Season, through_week: u8) -> Result<ExportReport> {
    let pools = regional_pool(season, through_week)?;
    let mut workbook = Workbook::new();
    let mut rows_written = 0usize;

    for pool in &pools {
        let rows = pool_rows(pool);
        rows_written += rows.len().saturating_sub(1);
        let sheet = workbook.add_worksheet();
        sheet.set_name(format!("Week {}", pool.week))?;
        write_rows(sheet, &rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        weeks: pools.len(),
        rows: rows_written,
    })
}

fn pool_rows(pool: &WeekPool) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Rank".to_string(),
        "Team".to_string(),
        "Total".to_string(),
        "Playoff".to_string(),
        "Alliance".to_string(),
        "Quals".to_string(),
        "Best 1".to_string(),
        "Best 2".to_string(),
        "Best 3".to_string(),
        "Qualified".to_string(),
        "Reason".to_string(),
        "Event".to_string(),
        "Declined".to_string(),
    ]];
    for entry in &pool.entries {
        let points = entry.points;
        rows.push(vec![
            entry.rank.to_string(),
            entry.team_number.to_string(),
            points.total.to_string(),
            points.playoff.to_string(),
            points.alliance.to_string(),
            points.quals.to_string(),
            points.best1.to_string(),
            points.best2.to_string(),
            points.best3.to_string(),
            if entry.status.is_qualified { "yes" } else { "" }.to_string(),
            entry.status.qualified_for.clone().unwrap_or_default(),
            entry.status.qualified_event.clone().unwrap_or_default(),
            if entry.status.declined { "yes" } else { "" }.to_string(),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
