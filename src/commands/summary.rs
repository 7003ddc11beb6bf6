use crate::commands::{open, persist, Out};
use crate::error::{invalid, ErrorType, IntoResult};
use crate::model::SummaryTable;
use crate::{Config, Result};
use chrono::{Datelike, Local};
use std::ops::RangeInclusive;
use std::path::Path;

const YEARS: RangeInclusive<i32> = 2000..=2100;

/// Rebuilds the Summary sheet for `year`, or the current year when `None`, and saves.
pub fn summary(config: &Config, workbook: &Path, year: Option<i32>) -> Result<Out<SummaryTable>> {
    let year = year.unwrap_or_else(|| Local::now().year());
    if !YEARS.contains(&year) {
        return invalid(format!(
            "The year must be between {} and {}, got {year}",
            YEARS.start(),
            YEARS.end()
        ));
    }

    let mut ledger = open(workbook)?;
    let table = ledger
        .rebuild_summary(year)
        .pub_result(ErrorType::Storage)?;
    persist(config, &mut ledger)?;

    Ok(Out::new(
        format!(
            "Rebuilt the Summary sheet for {year} with {} staff",
            table.rows().len()
        ),
        table,
    ))
}
