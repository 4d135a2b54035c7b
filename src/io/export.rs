//! Export the derived dataset to CSV.
//!
//! One row per grid point: `x` followed by one column per selected series.
//! Undefined cells are written as empty fields so spreadsheets keep them blank.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::curves::DerivedDataset;
use crate::domain::Series;
use crate::error::AppError;

/// Write `series` (all columns when empty) to any writer.
pub fn write_dataset_csv<W: Write>(
    writer: W,
    dataset: &DerivedDataset,
    series: &[Series],
) -> Result<(), AppError> {
    let columns: &[Series] = if series.is_empty() { &Series::ALL } else { series };
    let mut w = csv::Writer::from_writer(writer);

    let header = std::iter::once("x").chain(columns.iter().map(|s| s.name()));
    w.write_record(header)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (i, x) in dataset.x().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(x.to_string());
        for s in columns {
            record.push(dataset.column(*s)[i].map(|v| v.to_string()).unwrap_or_default());
        }
        w.write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    w.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the dataset to a CSV file.
pub fn write_dataset_csv_file(
    path: &Path,
    dataset: &DerivedDataset,
    series: &[Series],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_dataset_csv(file, dataset, series)?;
    info!(path = %path.display(), rows = dataset.len(), "dataset exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::generate;
    use crate::domain::{ParameterSet, ToggleSet};

    fn dataset() -> DerivedDataset {
        let params = ParameterSet::default();
        let (b1, b2) = params.effective_biases();
        generate(&params, &ToggleSet::default(), b1, b2).unwrap()
    }

    #[test]
    fn header_and_row_count() {
        let d = dataset();
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &d, &[Series::Curve1Delta1, Series::NetDelta1]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,curve1_delta1,net_delta1"));
        assert_eq!(lines.count(), d.len());
    }

    #[test]
    fn undefined_cells_are_empty_fields() {
        let d = dataset();
        // curve2 is ln(2 - x/10): undefined from x = 20 on, which the default
        // range ends on.
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &d, &[Series::Curve2Delta1]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(last, "20,");
    }

    #[test]
    fn empty_selection_writes_every_series() {
        let d = dataset();
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &d, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header.split(',').count(), Series::ALL.len() + 1);
    }
}
