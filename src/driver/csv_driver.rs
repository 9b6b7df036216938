//! CSV operation-log mode: each row is an operation (`+` insert, `-` delete, `?`
//! search) against whichever engine the CLI selected. Header-tolerant per spec §6:
//! row 0 is treated as a header iff its first column is `OP`, case-insensitively.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::timing::{OpTimer, TimingRecorder};
use super::Engine;
use crate::error::IndexError;
use crate::record::Record;

/// One parsed operation from a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DriverOp {
    Insert(Vec<i32>),
    Delete(i32),
    Search(i32),
}

/// True iff `row` is a header row: column 0 case-insensitively equals `OP`.
fn is_header_row(row: &StringRecord) -> bool {
    row.get(0).map(|c| c.eq_ignore_ascii_case("op")).unwrap_or(false)
}

fn parse_int(field: Option<&str>) -> Result<i32, IndexError> {
    field
        .ok_or_else(|| IndexError::malformed("missing field"))?
        .trim()
        .parse::<i32>()
        .map_err(|e| IndexError::malformed(format!("not an integer: {e}")))
}

fn parse_op(row: &StringRecord) -> Result<DriverOp, IndexError> {
    let code = row
        .get(0)
        .ok_or_else(|| IndexError::malformed("empty row"))?
        .trim();

    match code {
        "+" => {
            let fields = row
                .iter()
                .skip(1)
                .map(|f| {
                    f.trim()
                        .parse::<i32>()
                        .map_err(|e| IndexError::malformed(format!("not an integer: {e}")))
                })
                .collect::<Result<Vec<i32>, IndexError>>()?;
            Ok(DriverOp::Insert(fields))
        }
        "-" => Ok(DriverOp::Delete(parse_int(row.get(1))?)),
        "?" => Ok(DriverOp::Search(parse_int(row.get(1))?)),
        other => Err(IndexError::malformed(format!("unknown op code: {other}"))),
    }
}

/// Apply one parsed operation, returning the line to print on success.
fn apply_op(engine: &mut Engine, op: DriverOp) -> Result<String, IndexError> {
    match op {
        DriverOp::Insert(fields) => {
            let expected = engine.num_fields();
            if fields.len() != expected {
                return Err(IndexError::ArityMismatch {
                    expected,
                    actual: fields.len(),
                });
            }
            engine.insert(Record::new(fields))?;
            Ok("OK".to_string())
        }
        DriverOp::Delete(key) => {
            let found = engine.delete(key);
            Ok(format!("OK deleted={found}"))
        }
        DriverOp::Search(key) => match engine.search(key) {
            Some(record) => Ok(format!("OK {:?}", record.fields())),
            None => Ok("OK not_found".to_string()),
        },
    }
}

/// Drive `engine` from CSV rows read off `reader`, printing a per-op line and a
/// trailing aggregate timing summary to stdout, and logging unknown op codes to
/// stderr. Returns the total number of rows successfully applied.
pub fn run_csv_from_reader<R: Read>(engine: &mut Engine, reader: R) -> io::Result<usize> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut recorder = TimingRecorder::new();
    let mut applied = 0usize;
    let mut records = csv_reader.records();

    if let Some(first) = records.next() {
        let first = first.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if !is_header_row(&first) {
            run_one_row(engine, &first, &mut recorder, &mut applied);
        }
    }

    for row in records {
        let row = row.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        run_one_row(engine, &row, &mut recorder, &mut applied);
    }

    let summary = recorder.summary();
    println!(
        "--- {} ops: total={:?} mean={:?} min={:?} max={:?}",
        summary.count,
        summary.total,
        summary.mean(),
        summary.min,
        summary.max
    );

    Ok(applied)
}

fn run_one_row(engine: &mut Engine, row: &StringRecord, recorder: &mut TimingRecorder, applied: &mut usize) {
    let op = match parse_op(row) {
        Ok(op) => op,
        Err(e) => {
            eprintln!("SKIP: {e}");
            return;
        }
    };

    let timer = OpTimer::start();
    let result = apply_op(engine, op);
    let elapsed = timer.stop();
    recorder.record(elapsed);

    match result {
        Ok(line) => {
            println!("{line} ({elapsed:?})");
            *applied += 1;
        }
        Err(e) => eprintln!("ERROR: {e}"),
    }
}

/// Open `path` and drive `engine` from its contents. The CLI entry point's CSV mode.
pub fn run_csv(engine: &mut Engine, path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    run_csv_from_reader(engine, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LhtConfig;

    fn row(fields: &[&str]) -> StringRecord {
        fields.iter().copied().collect()
    }

    #[test]
    fn detects_header_row_case_insensitively() {
        assert!(is_header_row(&row(&["OP", "a", "b"])));
        assert!(is_header_row(&row(&["op"])));
        assert!(!is_header_row(&row(&["+", "1", "2"])));
    }

    #[test]
    fn parses_insert_delete_search_ops() {
        assert_eq!(parse_op(&row(&["+", "1", "2"])).unwrap(), DriverOp::Insert(vec![1, 2]));
        assert_eq!(parse_op(&row(&["-", "5"])).unwrap(), DriverOp::Delete(5));
        assert_eq!(parse_op(&row(&["?", "5"])).unwrap(), DriverOp::Search(5));
    }

    #[test]
    fn unknown_op_code_is_an_error() {
        assert!(parse_op(&row(&["!", "1"])).is_err());
    }

    #[test]
    fn csv_mode_drives_engine_end_to_end() {
        let mut engine = Engine::new_lht(&LhtConfig::new(2, 40));
        let csv = "OP,a,b\n+,3,30\n+,4,40\n?,3\n-,3\n?,3\n";
        let applied = run_csv_from_reader(&mut engine, csv.as_bytes()).unwrap();
        assert_eq!(applied, 5);
        assert!(engine.search(3).is_none());
        assert_eq!(engine.search(4).unwrap().key(), 4);
    }

    #[test]
    fn unknown_op_codes_are_skipped_not_applied() {
        let mut engine = Engine::new_lht(&LhtConfig::new(2, 40));
        let csv = "!,1,2\n+,3,30\n";
        let applied = run_csv_from_reader(&mut engine, csv.as_bytes()).unwrap();
        assert_eq!(applied, 1);
    }
}
