use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, EUC_KR, UTF_8};
use log::{error, info, warn};

use super::model::{is_missing_marker, Dataset};
use crate::error::{PreprocessError, Result};

/// Encoding KOSIS uses for its CSV downloads.
pub const DEFAULT_ENCODING: &str = "cp949";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load `file_name` from `data_dir`, degrading every failure to `None`.
///
/// A missing file logs the expected path; any other failure (decoding,
/// malformed rows) logs the error message. On success the row count is
/// logged.
pub fn load_kosis_csv(data_dir: &Path, file_name: &str, encoding: &str) -> Option<Dataset> {
    let path = data_dir.join(file_name);
    match read_csv(&path, encoding) {
        Ok(dataset) => {
            info!("loaded {file_name} ({} rows)", dataset.len());
            Some(dataset)
        }
        Err(PreprocessError::FileNotFound { path }) => {
            warn!("{file_name} not found (expected at {})", path.display());
            None
        }
        Err(e) => {
            error!("failed to load {file_name}: {e}");
            None
        }
    }
}

/// Read a CSV file in the given encoding into a [`Dataset`].
///
/// The first record is the header. Cells matching a missing-value marker
/// become missing; column types are inferred per column.
pub fn read_csv(path: &Path, encoding: &str) -> Result<Dataset> {
    if !path.is_file() {
        return Err(PreprocessError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let encoding = resolve_encoding(encoding)?;
    let bytes = std::fs::read(path)?;
    let text = decode_strict(&bytes, encoding).ok_or_else(|| PreprocessError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.name().to_string(),
    })?;
    parse_csv(&text)
}

/// Parse already-decoded CSV text into a [`Dataset`].
///
/// Short rows are padded with missing cells; rows longer than the header
/// are an error, as is input without a header.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = dedup_headers(reader.headers()?.iter());
    if headers.is_empty() {
        return Err(PreprocessError::EmptyData);
    }

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(PreprocessError::RowTooLong {
                row: row + 1,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut cells: Vec<Option<String>> = record
            .iter()
            .map(|cell| (!is_missing_marker(cell)).then(|| cell.to_string()))
            .collect();
        cells.resize(headers.len(), None);
        rows.push(cells);
    }

    Dataset::from_text_rows(headers, rows)
}

/// Resolve an encoding label.
///
/// Accepts WHATWG labels plus `cp949` (served by EUC-KR, which covers the
/// unified Hangul code) and `utf-8-sig`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "cp949" | "ms949" | "uhc" => Ok(EUC_KR),
        "utf-8-sig" | "utf_8_sig" | "utf8-sig" => Ok(UTF_8),
        other => Encoding::for_label(other.as_bytes())
            .ok_or_else(|| PreprocessError::UnsupportedEncoding(label.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode without replacement characters; `None` on malformed input.
fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
fn dedup_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for (i, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while headers.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        headers.push(candidate);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnData, Value};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(dir: &TempDir, name: &str, bytes: &[u8]) {
        let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
        f.write_all(bytes).unwrap();
    }

    #[test]
    fn test_read_csv_row_count() {
        let dir = TempDir::new().unwrap();
        write_bytes(&dir, "pop.csv", b"year,count\n2015,10\n2016,20\n2017,30\n");

        let ds = load_kosis_csv(dir.path(), "pop.csv", "utf-8").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names(), vec!["year", "count"]);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_kosis_csv(dir.path(), "nope.csv", DEFAULT_ENCODING).is_none());

        let err = read_csv(&dir.path().join("nope.csv"), DEFAULT_ENCODING).unwrap_err();
        assert!(matches!(err, PreprocessError::FileNotFound { .. }));
    }

    #[test]
    fn test_cp949_decoding() {
        let dir = TempDir::new().unwrap();
        let text = "시점,인구 (명)\n2020,\"2,500,000\"\n";
        let (encoded, _, had_errors) = EUC_KR.encode(text);
        assert!(!had_errors);
        write_bytes(&dir, "kr.csv", &encoded);

        let ds = read_csv(&dir.path().join("kr.csv"), "cp949").unwrap();
        assert_eq!(ds.column_names(), vec!["시점", "인구 (명)"]);
        assert_eq!(
            ds.column("인구 (명)").unwrap().data.get(0),
            Value::Text("2,500,000".into())
        );
    }

    #[test]
    fn test_invalid_bytes_are_load_error() {
        let dir = TempDir::new().unwrap();
        write_bytes(&dir, "bad.csv", b"a,b\n\xff\xfe,1\n");

        let err = read_csv(&dir.path().join("bad.csv"), "utf-8").unwrap_err();
        assert!(matches!(err, PreprocessError::Decode { .. }));
        assert!(load_kosis_csv(dir.path(), "bad.csv", "utf-8").is_none());
    }

    #[test]
    fn test_long_rows_are_load_error() {
        let dir = TempDir::new().unwrap();
        write_bytes(&dir, "ragged.csv", b"a,b\n1,2\n3,4,5\n");

        let err = read_csv(&dir.path().join("ragged.csv"), "utf-8").unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::RowTooLong { row: 2, expected: 2, found: 3 }
        ));
        assert!(load_kosis_csv(dir.path(), "ragged.csv", "utf-8").is_none());
    }

    #[test]
    fn test_short_rows_are_padded_with_missing() {
        let ds = parse_csv("a,b,c\n1,2,3\n4,5\n").unwrap();
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(
            ds.column("c").unwrap().data,
            ColumnData::Integer(vec![Some(3), None])
        );
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = TempDir::new().unwrap();
        write_bytes(&dir, "e.csv", b"");
        write_bytes(&dir, "bom_only.csv", b"\xEF\xBB\xBF");

        assert!(matches!(
            read_csv(&dir.path().join("e.csv"), "utf-8"),
            Err(PreprocessError::EmptyData)
        ));
        assert!(load_kosis_csv(dir.path(), "e.csv", "utf-8").is_none());
        assert!(load_kosis_csv(dir.path(), "bom_only.csv", "utf-8-sig").is_none());
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let dir = TempDir::new().unwrap();
        write_bytes(&dir, "bom.csv", b"\xEF\xBB\xBFyear,v\n2020,1\n");

        let ds = read_csv(&dir.path().join("bom.csv"), "utf-8-sig").unwrap();
        assert_eq!(ds.column_names(), vec!["year", "v"]);
    }

    #[test]
    fn test_missing_markers_and_inference() {
        let ds = parse_csv("a,b,c\n1,x,\n2,NA,1.5\n").unwrap();
        assert_eq!(
            ds.column("a").unwrap().data,
            ColumnData::Integer(vec![Some(1), Some(2)])
        );
        assert_eq!(
            ds.column("b").unwrap().data,
            ColumnData::Text(vec![Some("x".into()), None])
        );
        assert_eq!(ds.column("c").unwrap().data, ColumnData::Float(vec![None, Some(1.5)]));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let ds = parse_csv("a,,a,a\n1,2,3,4\n").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn test_resolve_encoding_aliases() {
        assert_eq!(resolve_encoding("CP949").unwrap(), EUC_KR);
        assert_eq!(resolve_encoding("euc-kr").unwrap(), EUC_KR);
        assert_eq!(resolve_encoding("utf-8-sig").unwrap(), UTF_8);
        assert!(matches!(
            resolve_encoding("klingon"),
            Err(PreprocessError::UnsupportedEncoding(_))
        ));
    }
}
