//! テスト用の録画ファイル生成

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int32Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

const SCHEMA: &str = "
    message recording {
        REQUIRED INT32 frame;
        REQUIRED BYTE_ARRAY row_id (UTF8);
        REQUIRED BYTE_ARRAY type (UTF8);
        REQUIRED INT32 landmark_index;
        OPTIONAL DOUBLE x;
        OPTIONAL DOUBLE y;
        OPTIONAL DOUBLE z;
        OPTIONAL BYTE_ARRAY signer (UTF8);
    }
";

#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub row_id: String,
    pub frame: i32,
    pub kind: String,
    pub landmark_index: i32,
    pub xyz: [Option<f64>; 3],
    pub signer: Option<String>,
}

impl FixtureRow {
    pub fn new(row_id: &str, frame: i32, kind: &str, landmark_index: i32, xyz: [f64; 3]) -> Self {
        Self {
            row_id: row_id.to_string(),
            frame,
            kind: kind.to_string(),
            landmark_index,
            xyz: xyz.map(Some),
            signer: None,
        }
    }

    /// 指定軸を欠損にする
    pub fn missing(mut self, axis: usize) -> Self {
        self.xyz[axis] = None;
        self
    }

    pub fn signer(mut self, signer: &str) -> Self {
        self.signer = Some(signer.to_string());
        self
    }
}

/// 1フレーム分の手 (21点すべて同じ座標)
pub fn hand_frame(kind: &str, frame: i32, xyz: [f64; 3]) -> Vec<FixtureRow> {
    (0..21)
        .map(|i| FixtureRow::new(&format!("{}-{}-{}", frame, kind, i), frame, kind, i, xyz))
        .collect()
}

pub fn write_recording(path: &Path, rows: &[FixtureRow]) {
    let schema = Arc::new(parse_message_type(SCHEMA).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();
    let mut group = writer.next_row_group().unwrap();

    let frames: Vec<i32> = rows.iter().map(|r| r.frame).collect();
    let mut col = group.next_column().unwrap().unwrap();
    col.typed::<Int32Type>().write_batch(&frames, None, None).unwrap();
    col.close().unwrap();

    for text in [
        rows.iter().map(|r| ByteArray::from(r.row_id.as_str())).collect::<Vec<_>>(),
        rows.iter().map(|r| ByteArray::from(r.kind.as_str())).collect::<Vec<_>>(),
    ] {
        let mut col = group.next_column().unwrap().unwrap();
        col.typed::<ByteArrayType>().write_batch(&text, None, None).unwrap();
        col.close().unwrap();
    }

    let indices: Vec<i32> = rows.iter().map(|r| r.landmark_index).collect();
    let mut col = group.next_column().unwrap().unwrap();
    col.typed::<Int32Type>().write_batch(&indices, None, None).unwrap();
    col.close().unwrap();

    for axis in 0..3 {
        let values: Vec<f64> = rows.iter().filter_map(|r| r.xyz[axis]).collect();
        let levels: Vec<i16> = rows.iter().map(|r| r.xyz[axis].is_some() as i16).collect();
        let mut col = group.next_column().unwrap().unwrap();
        col.typed::<DoubleType>()
            .write_batch(&values, Some(&levels), None)
            .unwrap();
        col.close().unwrap();
    }

    let signers: Vec<ByteArray> = rows
        .iter()
        .filter_map(|r| r.signer.as_deref().map(ByteArray::from))
        .collect();
    let levels: Vec<i16> = rows.iter().map(|r| r.signer.is_some() as i16).collect();
    let mut col = group.next_column().unwrap().unwrap();
    col.typed::<ByteArrayType>()
        .write_batch(&signers, Some(&levels), None)
        .unwrap();
    col.close().unwrap();

    group.close().unwrap();
    writer.close().unwrap();
}

/// parquet として読めないファイル
pub fn write_garbage(path: &Path) {
    fs::write(path, b"this is not a parquet file").unwrap();
}
