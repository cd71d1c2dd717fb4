//! Append one source file to a table directory, per source format.
//!
//! `csv` goes through the `csv` reader and writer, `json` is one record per line; any other
//! format is copied as-is.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::tools::file_name;
use crate::types::ReaderOptions;
use crate::utils::config::PackagePaths;
use crate::utils::tempfiles::write_atomic;

/// Table metadata kept next to the data as `_table.json`. Written by the first ingested file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub format: String,
    #[serde(default)]
    pub columns: Vec<String>,
    /// Inferred column types, parallel to `columns`. `None` when schema inference is off.
    #[serde(default)]
    pub column_types: Option<Vec<String>>,
}

pub fn table_meta_file(table_dir: &Path) -> PathBuf {
    table_dir.join(PackagePaths::get().table_meta_filename())
}

pub fn load_table_meta(table_dir: &Path) -> Result<Option<TableMeta>> {
    let path = table_meta_file(table_dir);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let meta = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(meta))
}

fn save_table_meta(table_dir: &Path, meta: &TableMeta) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(meta).context("serialize table metadata")?;
    write_atomic(&table_meta_file(table_dir), &bytes)
}

/// Append `file` to the table at `table_dir`. Returns the number of records appended.
pub fn append_file(table_dir: &Path, file: &Path, reader: &ReaderOptions) -> Result<u64> {
    fs::create_dir_all(table_dir)
        .with_context(|| format!("create table dir {}", table_dir.display()))?;
    match reader.format.to_ascii_lowercase().as_str() {
        "csv" => append_csv(table_dir, file, reader),
        "json" => append_json(table_dir, file, reader),
        _ => copy_raw(table_dir, file),
    }
}

fn read_lines(file: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(file).with_context(|| format!("read source file {}", file.display()))?;
    Ok(content
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect())
}

fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    for line in lines {
        writeln!(f, "{}", line).with_context(|| format!("append to {}", path.display()))?;
    }
    f.sync_data()
        .with_context(|| format!("sync {}", path.display()))
}

/// Narrowest type that fits every non-empty value: `bigint`, `double`, `boolean`, else `string`.
pub fn infer_column_type<'a, I>(values: I) -> &'static str
where
    I: IntoIterator<Item = &'a str>,
{
    let (mut int, mut double, mut boolean, mut any) = (true, true, true, false);
    for v in values.into_iter().map(str::trim).filter(|v| !v.is_empty()) {
        any = true;
        int &= v.parse::<i64>().is_ok();
        double &= v.parse::<f64>().is_ok();
        boolean &= v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false");
    }
    match (any, int, double, boolean) {
        (false, ..) => "string",
        (true, true, _, _) => "bigint",
        (true, _, true, _) => "double",
        (true, _, _, true) => "boolean",
        _ => "string",
    }
}

/// Header (when `reader.header` and the file is non-empty) and data records of one CSV file.
fn read_csv(
    file: &Path,
    reader: &ReaderOptions,
) -> Result<(Option<StringRecord>, Vec<StringRecord>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(reader.header)
        .from_path(file)
        .with_context(|| format!("open source file {}", file.display()))?;
    let header = if reader.header {
        let h = rdr
            .headers()
            .with_context(|| format!("read header of {}", file.display()))?
            .clone();
        (!h.is_empty()).then_some(h)
    } else {
        None
    };
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("read records of {}", file.display()))?;
    Ok((header, rows))
}

fn append_records(path: &Path, records: &[&StringRecord]) -> Result<()> {
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(f);
    for record in records {
        wtr.write_record(*record)
            .with_context(|| format!("append to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    wtr.get_ref()
        .sync_data()
        .with_context(|| format!("sync {}", path.display()))
}

fn append_csv(table_dir: &Path, file: &Path, reader: &ReaderOptions) -> Result<u64> {
    let (header, rows) = read_csv(file, reader)?;

    let data_path = table_dir.join("data.csv");
    let existing = load_table_meta(table_dir)?;
    let columns: Vec<String> = match (&header, rows.first()) {
        (Some(h), _) => h.iter().map(str::to_string).collect(),
        (None, Some(first)) => (0..first.len()).map(|i| format!("_c{}", i)).collect(),
        (None, None) => return Ok(0),
    };

    match existing {
        Some(meta) if meta.columns != columns => bail!(
            "header of {} does not match table columns [{}]",
            file.display(),
            meta.columns.join(", ")
        ),
        Some(_) => {}
        None => {
            let column_types = reader.infer_schema.then(|| {
                (0..columns.len())
                    .map(|i| infer_column_type(rows.iter().filter_map(|r| r.get(i))).to_string())
                    .collect()
            });
            save_table_meta(
                table_dir,
                &TableMeta {
                    format: "csv".to_string(),
                    columns,
                    column_types,
                },
            )?;
        }
    }

    let mut out: Vec<&StringRecord> = Vec::with_capacity(rows.len() + 1);
    if !data_path.exists()
        && let Some(h) = &header
    {
        out.push(h);
    }
    out.extend(rows.iter());
    append_records(&data_path, &out)?;
    Ok(rows.len() as u64)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null | Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "bigint",
        Value::Number(_) => "double",
        Value::Array(_) => "array",
        Value::Object(_) => "struct",
    }
}

fn append_json(table_dir: &Path, file: &Path, reader: &ReaderOptions) -> Result<u64> {
    let lines = read_lines(file)?;
    let mut first_record: Option<serde_json::Value> = None;
    for (n, line) in lines.iter().enumerate() {
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("{} line {}: invalid JSON", file.display(), n + 1))?;
        if first_record.is_none() {
            first_record = Some(value);
        }
    }

    if load_table_meta(table_dir)?.is_none()
        && let Some(serde_json::Value::Object(obj)) = &first_record
    {
        let columns: Vec<String> = obj.keys().cloned().collect();
        let column_types = reader
            .infer_schema
            .then(|| obj.values().map(|v| json_type(v).to_string()).collect());
        save_table_meta(
            table_dir,
            &TableMeta {
                format: "json".to_string(),
                columns,
                column_types,
            },
        )?;
    }

    append_lines(&table_dir.join("data.jsonl"), &lines)?;
    Ok(lines.len() as u64)
}

fn copy_raw(table_dir: &Path, file: &Path) -> Result<u64> {
    let files_dir = table_dir.join("files");
    fs::create_dir_all(&files_dir)
        .with_context(|| format!("create {}", files_dir.display()))?;
    let name = file_name(&file.to_string_lossy()).to_string();
    fs::copy(file, files_dir.join(&name))
        .with_context(|| format!("copy {} into {}", file.display(), files_dir.display()))?;
    Ok(0)
}
