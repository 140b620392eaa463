//! CSV artifact writing.

use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::ReportError;
use crate::pipeline::PipelineOutput;

/// Write every artifact of a run into `dir`, returning the written paths.
///
/// The decision-data files are only written when that extraction
/// succeeded; their absence is already reported by the pipeline.
pub fn write_artifacts(out: &PipelineOutput, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("initializations_table.csv");
    let mut writer = Writer::from_path(&path)?;
    writer.write_record(&out.table.columns)?;
    for row in &out.table.rows {
        let mut record = Vec::with_capacity(out.table.columns.len());
        record.push(row.id.to_string());
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    written.push(path);

    written.push(write_single_row(
        dir.join("protected_characteristics.csv"),
        &out.protected_characteristics,
    )?);

    written.push(write_pairs(
        dir.join("attributes_data_types.csv"),
        &out.data_types,
    )?);

    written.push(write_single_row(
        dir.join("class_names.csv"),
        &out.class_names,
    )?);

    if let Some(decisions) = &out.decision_attributes {
        written.push(write_single_row(
            dir.join("decision_data_attribs.csv"),
            &decisions.columns,
        )?);
        written.push(write_pairs(
            dir.join("decision_data_attribs_types.csv"),
            &decisions.types,
        )?);
    }

    Ok(written)
}

fn write_single_row(path: PathBuf, row: &[String]) -> Result<PathBuf, ReportError> {
    let mut writer = Writer::from_path(&path)?;
    // The csv writer rejects zero-field records; an empty extraction
    // still produces its (empty) artifact file.
    if !row.is_empty() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_pairs(path: PathBuf, pairs: &[(String, String)]) -> Result<PathBuf, ReportError> {
    let mut writer = Writer::from_path(&path)?;
    for (left, right) in pairs {
        writer.write_record([left.as_str(), right.as_str()])?;
    }
    writer.flush()?;
    Ok(path)
}
