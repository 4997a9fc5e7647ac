//! 録画ファイル (parquet) の読み込み。
//!
//! 1レコード = 1ランドマーク。必須列は `row_id`, `frame`, `type`, `x`, `y`, `z`。
//! `landmark_index` は任意、それ以外の列は null でなければ文字列として保持する。

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};

use super::CorpusError;
use crate::landmark::{LandmarkType, RawLandmarkRow};

/// 1ファイルを丸ごと読み込む。1レコードでも読めなければエラー
pub fn read_recording(path: &Path) -> Result<Vec<RawLandmarkRow>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader =
        SerializedFileReader::new(file).map_err(|e| CorpusError::decode(path, e.to_string()))?;
    let records = reader
        .get_row_iter(None)
        .map_err(|e| CorpusError::decode(path, e.to_string()))?;

    records
        .map(|record| {
            let record = record.map_err(|e| CorpusError::decode(path, e.to_string()))?;
            decode_row(&record).map_err(|reason| CorpusError::decode(path, reason))
        })
        .collect()
}

fn decode_row(record: &Row) -> Result<RawLandmarkRow, String> {
    let mut row_id = None;
    let mut frame = None;
    let mut kind = None;
    let mut landmark_index = None;
    let mut coords: [Option<Option<f64>>; 3] = [None, None, None];
    let mut passengers = BTreeMap::new();

    for (name, field) in record.get_column_iter() {
        match name.as_str() {
            "row_id" => row_id = Some(field_text(field)),
            "frame" => frame = Some(field_int(name, field)?),
            "type" => kind = Some(field_text(field).parse::<LandmarkType>()?),
            "landmark_index" => {
                landmark_index = match field {
                    Field::Null => None,
                    f => Some(usize::try_from(field_int(name, f)?).map_err(|_| {
                        format!("negative landmark_index {}", f)
                    })?),
                }
            }
            "x" => coords[0] = Some(field_float(name, field)?),
            "y" => coords[1] = Some(field_float(name, field)?),
            "z" => coords[2] = Some(field_float(name, field)?),
            // 値のない付随列は持たない
            _ if matches!(field, Field::Null) => {}
            other => {
                passengers.insert(other.to_string(), field_text(field));
            }
        }
    }

    let [x, y, z] = coords;
    Ok(RawLandmarkRow {
        row_id: row_id.ok_or("missing column `row_id`")?,
        frame: frame.ok_or("missing column `frame`")?,
        kind: kind.ok_or("missing column `type`")?,
        landmark_index,
        x: x.ok_or("missing column `x`")?,
        y: y.ok_or("missing column `y`")?,
        z: z.ok_or("missing column `z`")?,
        passengers,
    })
}

fn field_text(field: &Field) -> String {
    match field {
        Field::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field_int(name: &str, field: &Field) -> Result<i64, String> {
    match field {
        Field::Byte(v) => Ok(*v as i64),
        Field::Short(v) => Ok(*v as i64),
        Field::Int(v) => Ok(*v as i64),
        Field::Long(v) => Ok(*v),
        Field::UByte(v) => Ok(*v as i64),
        Field::UShort(v) => Ok(*v as i64),
        Field::UInt(v) => Ok(*v as i64),
        Field::ULong(v) => i64::try_from(*v).map_err(|_| format!("`{}` out of range: {}", name, v)),
        other => Err(format!("`{}` is not an integer: {}", name, other)),
    }
}

/// Null は欠損 (None)
fn field_float(name: &str, field: &Field) -> Result<Option<f64>, String> {
    match field {
        Field::Null => Ok(None),
        Field::Float(v) => Ok(Some(*v as f64)),
        Field::Double(v) => Ok(Some(*v)),
        other => field_int(name, other).map(|v| Some(v as f64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixture::{write_garbage, write_recording, FixtureRow};

    #[test]
    fn test_read_recording_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.parquet");
        write_recording(
            &path,
            &[
                FixtureRow::new("0-face-0", 0, "face", 0, [0.1, 0.2, 0.3]),
                FixtureRow::new("0-left_hand-4", 0, "left_hand", 4, [0.4, 0.5, 0.6]),
                FixtureRow::new("1-right_hand-7", 1, "right_hand", 7, [0.0, 0.0, 0.0]).missing(2),
            ],
        );

        let rows = read_recording(&path).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].kind, LandmarkType::Face);
        assert_eq!(rows[1].row_id, "0-left_hand-4");
        assert_eq!(rows[1].frame, 0);
        assert_eq!(rows[1].landmark_index, Some(4));
        assert_eq!(rows[1].x, Some(0.4));
        assert_eq!(rows[2].frame, 1);
        assert_eq!(rows[2].kind, LandmarkType::RightHand);
        assert_eq!(rows[2].z, None);
        assert!(rows[2].has_missing());
        assert!(rows[1].passengers.is_empty());
    }

    #[test]
    fn test_read_recording_passenger_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.parquet");
        write_recording(
            &path,
            &[
                FixtureRow::new("0-left_hand-0", 0, "left_hand", 0, [0.1, 0.2, 0.3]).signer("s26"),
                FixtureRow::new("0-left_hand-1", 0, "left_hand", 1, [0.4, 0.5, 0.6]),
            ],
        );

        let rows = read_recording(&path).unwrap();
        assert_eq!(rows[0].passengers.len(), 1);
        assert_eq!(rows[0].passengers.get("signer").map(String::as_str), Some("s26"));
        assert!(rows[1].passengers.is_empty());
    }

    #[test]
    fn test_read_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        write_garbage(&path);
        let err = read_recording(&path).unwrap_err();
        assert!(matches!(err, CorpusError::Decode { .. }));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_recording(&dir.path().join("nope.parquet")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn test_field_int_widths() {
        assert_eq!(field_int("frame", &Field::Short(7)), Ok(7));
        assert_eq!(field_int("frame", &Field::Long(-3)), Ok(-3));
        assert!(field_int("frame", &Field::Str("x".into())).is_err());
    }

    #[test]
    fn test_field_float_null_is_missing() {
        assert_eq!(field_float("x", &Field::Null), Ok(None));
        assert_eq!(field_float("x", &Field::Float(0.5)), Ok(Some(0.5)));
        assert_eq!(field_float("x", &Field::Int(2)), Ok(Some(2.0)));
    }
}
