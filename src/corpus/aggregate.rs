use std::collections::HashMap;

use crate::config::{GroupKey, MissingPolicy};
use crate::landmark::{KeywordTable, LandmarkRow, LandmarkTable, RawLandmarkRow};

/// 手以外の行を捨て、欠損を方針どおりに処理し、フレーム順に並べる
pub fn clean_recording(raw: Vec<RawLandmarkRow>, missing: MissingPolicy) -> LandmarkTable {
    let rows = raw
        .into_iter()
        .filter(|r| r.kind.is_hand())
        .filter_map(|r| match missing {
            MissingPolicy::Zero => Some(r.zero_filled()),
            MissingPolicy::Drop => r.complete(),
        })
        .collect();
    let mut table = LandmarkTable::new(rows);
    table.sort_by_frame();
    table
}

struct Accumulator<'a> {
    first: &'a LandmarkRow,
    sum: [f64; 3],
    count: usize,
}

/// 全録画を連結し、キーごとに座標の平均を取る。
///
/// 座標以外の列はキーの最初の出現行から取り、出力もその出現順に並ぶ。
/// `GroupKey::RowId` では出力は row_id ごとに1行。
pub fn average(recordings: &[LandmarkTable], grouping: GroupKey) -> LandmarkTable {
    let mut slots: HashMap<(&str, Option<i64>), usize> = HashMap::new();
    let mut accs: Vec<Accumulator> = Vec::new();

    for row in recordings.iter().flat_map(|t| t.rows.iter()) {
        let key = match grouping {
            GroupKey::RowId => (row.row_id.as_str(), None),
            GroupKey::RowIdAndFrame => (row.row_id.as_str(), Some(row.frame)),
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            accs.push(Accumulator {
                first: row,
                sum: [0.0; 3],
                count: 0,
            });
            accs.len() - 1
        });
        let acc = &mut accs[slot];
        acc.sum[0] += row.x;
        acc.sum[1] += row.y;
        acc.sum[2] += row.z;
        acc.count += 1;
    }

    let rows = accs
        .into_iter()
        .map(|acc| {
            let n = acc.count as f64;
            LandmarkRow {
                x: acc.sum[0] / n,
                y: acc.sum[1] / n,
                z: acc.sum[2] / n,
                ..acc.first.clone()
            }
        })
        .collect();
    LandmarkTable::new(rows)
}

/// 末尾の全ゼロフレームを落とす。
///
/// 非ゼロの行を持つ最大フレーム以下の行を残す。どのフレームも全ゼロなら None
pub fn trim(keyword: &str, averaged: LandmarkTable) -> Option<KeywordTable> {
    let last = averaged
        .rows
        .iter()
        .filter(|r| !r.is_all_zero())
        .map(|r| r.frame)
        .max()?;

    let mut table = averaged;
    table.rows.retain(|r| r.frame <= last);
    Some(KeywordTable::new(keyword, table, last))
}
