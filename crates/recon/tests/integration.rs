use sheetmatch_recon::dedup::merge_upload;
use sheetmatch_recon::filter::distinct_values;
use sheetmatch_recon::parse::drop_incomplete_rows;
use sheetmatch_recon::{
    match_against_master, pair_uploads, parse_grid, reconcile, HeaderPadding, KeyPattern,
    MatchMode, MemoryStore, ReconConfig, RowOutcome, SharedMaster, TableModel,
};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

// -------------------------------------------------------------------------
// Worked examples
// -------------------------------------------------------------------------

#[test]
fn order_number_enrichment() {
    let target = TableModel::from_strs(&["OrderNo", "City"], &[&["A1", "Beijing"], &["A2", "Shanghai"]]);
    let source = TableModel::from_strs(&["OrderNo", "Courier"], &[&["A1", "SF"]]);
    let keys = KeyPattern::compile_all(&["OrderNo"], MatchMode::Regex).unwrap();

    let out = reconcile(&target, &source, &keys).unwrap();
    assert_eq!(out.table.headers, vec!["OrderNo", "City", "OrderNo", "Courier"]);
    assert_eq!(out.table.rows, grid(&[&["A1", "Beijing", "A1", "SF"], &["A2", "Shanghai", "", ""]]));
    assert_eq!(out.summary.strict, 1);
    assert_eq!(out.summary.unmatched, 1);
}

#[test]
fn trailing_key_relaxation() {
    let target = TableModel::from_strs(&["Province", "City"], &[&["Guangdong", "Shenzhen"]]);
    let source = TableModel::from_strs(
        &["Province", "City", "Courier"],
        &[&["Guangdong", "Dongguan", "ZTO"]],
    );
    let keys = KeyPattern::compile_all(&["Province", "City"], MatchMode::Exact).unwrap();

    let out = reconcile(&target, &source, &keys).unwrap();
    assert_eq!(out.outcomes, vec![RowOutcome::Relaxed { source_row: 0 }]);
    assert_eq!(out.table.rows[0], vec!["Guangdong", "Shenzhen", "Guangdong", "Dongguan", "ZTO"]);
}

// -------------------------------------------------------------------------
// Accumulate, then match
// -------------------------------------------------------------------------

#[test]
fn repeated_uploads_then_match() {
    let master = SharedMaster::open(MemoryStore::default()).unwrap();
    let config = ReconConfig::default();

    let first = parse_grid(
        &grid(&[
            &["订单号", "省", "市", "区", "快递名称"],
            &["1001", "浙江", "杭州", "西湖", "SF"],
            &["1002", "浙江", "宁波", "鄞州", "YTO"],
            &["", "", "", "", ""],
        ]),
        HeaderPadding::Pad,
    );
    let out = master.import(first).unwrap();
    assert_eq!(out.appended, 2);

    // Same upload with columns shuffled plus one new row.
    let second = parse_grid(
        &grid(&[
            &["快递名称", "区", "市", "省", "订单号"],
            &["SF", "西湖", "杭州", "浙江", "1001"],
            &["ZTO", "南山", "深圳", "广东", "1003"],
        ]),
        HeaderPadding::Pad,
    );
    let out = master.import(second).unwrap();
    assert_eq!(out.appended, 1);
    assert_eq!(out.duplicates, 1);

    let snapshot = master.snapshot();
    assert_eq!(snapshot.rows.len(), 3);
    assert_eq!(snapshot.rows[2], vec!["1003", "广东", "深圳", "南山", "ZTO"]);
    assert_eq!(distinct_values(&snapshot, "快递名称"), vec!["SF", "YTO", "ZTO"]);

    let sheet = parse_grid(
        &grid(&[
            &["收件人", "省", "市", "区"],
            &["王五", "浙江", "宁波", "北仑"],
            &["赵六", "广东", "深圳", "南山"],
            &["钱七", "江苏", "南京", "玄武"],
        ]),
        HeaderPadding::Pad,
    );
    let out = match_against_master(&snapshot, &sheet, None, &config).unwrap();
    assert_eq!(out.table.rows.len(), 3);
    assert_eq!(out.outcomes[0], RowOutcome::Relaxed { source_row: 1 });
    assert_eq!(out.outcomes[1], RowOutcome::Strict { source_row: 2 });
    assert_eq!(out.outcomes[2], RowOutcome::Unmatched);
    assert_eq!(out.table.rows[0][4], "1002");

    // Narrowed to one courier, the Ningbo row has nothing to match.
    let out = match_against_master(&snapshot, &sheet, Some("ZTO"), &config).unwrap();
    assert_eq!(out.summary.matched(), 1);
    assert_eq!(out.outcomes[0], RowOutcome::Unmatched);
}

#[test]
fn paired_upload_then_import() {
    let orders = parse_grid(
        &grid(&[
            &["订单号", "省", "市", "区"],
            &["1001", "浙江", "杭州", "西湖"],
            &["1002", "浙江", "宁波", "鄞州"],
        ]),
        HeaderPadding::Pad,
    );
    let couriers = parse_grid(
        &grid(&[&["订单编号", "快递名称"], &["1002", "YTO"], &["1009", "SF"]]),
        HeaderPadding::Pad,
    );
    let key = KeyPattern::compile("订单.*号", MatchMode::Regex).unwrap();

    let mut paired = pair_uploads(&orders, &couriers, key).unwrap().table;
    assert_eq!(paired.headers, vec!["订单编号", "快递名称", "省", "市", "区"]);

    // 1009 had no order details; the incomplete-row filter drops it.
    assert_eq!(drop_incomplete_rows(&mut paired), 1);

    let mut master = TableModel::default();
    merge_upload(&mut master, paired).unwrap();
    assert_eq!(master.rows, grid(&[&["1002", "YTO", "浙江", "宁波", "鄞州"]]));
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

mod properties {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use sheetmatch_recon::{parse_grid, reconcile, HeaderPadding, KeyPattern, MatchMode, TableModel};

    fn config() -> ProptestConfig {
        ProptestConfig {
            cases: std::env::var("PROPTEST_CASES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256),
            failure_persistence: None,
            ..ProptestConfig::default()
        }
    }

    /// Small alphabet so keys collide often; empty cells are common.
    fn arb_cell() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => "[a-c]",
            1 => Just(String::new()),
            1 => Just("  ".to_string()),
        ]
    }

    fn arb_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(prop::collection::vec(arb_cell(), 0..5), 0..12)
    }

    fn arb_table(width: usize) -> impl Strategy<Value = TableModel> {
        prop::collection::vec(prop::collection::vec(arb_cell(), width), 0..10).prop_map(move |rows| {
            let headers = (0..width).map(|i| format!("k{i}")).collect();
            let rows = rows
                .into_iter()
                .map(|r| r.into_iter().map(|c| c.trim().to_string()).collect())
                .collect();
            TableModel::new(headers, rows)
        })
    }

    proptest! {
        #![proptest_config(config())]

        #[test]
        fn parsed_rows_are_header_width(g in arb_grid()) {
            let t = parse_grid(&g, HeaderPadding::Pad);
            for row in &t.rows {
                prop_assert_eq!(row.len(), t.headers.len());
            }
        }

        #[test]
        fn parsed_rows_are_never_blank(g in arb_grid()) {
            let t = parse_grid(&g, HeaderPadding::Preserve);
            for row in &t.rows {
                prop_assert!(row.iter().any(|c| !c.is_empty()));
            }
        }

        #[test]
        fn reconcile_preserves_rows_and_consumes_once(
            target in arb_table(3),
            source in arb_table(3),
            nkeys in 1usize..=3,
        ) {
            let names: Vec<String> = (0..nkeys).map(|i| format!("^k{i}$")).collect();
            let keys = KeyPattern::compile_all(&names, MatchMode::Regex).unwrap();
            let out = reconcile(&target, &source, &keys).unwrap();

            prop_assert_eq!(out.table.rows.len(), target.rows.len());
            prop_assert_eq!(out.outcomes.len(), target.rows.len());

            let mut used = HashSet::new();
            for (i, outcome) in out.outcomes.iter().enumerate() {
                prop_assert_eq!(out.table.rows[i].len(), 6);
                if let Some(j) = outcome.source_row() {
                    prop_assert!(used.insert(j), "source row {} consumed twice", j);
                    // The leading key always matched, and never on empty cells.
                    prop_assert!(!target.rows[i][0].is_empty());
                    prop_assert_eq!(&target.rows[i][0], &source.rows[j][0]);
                }
            }
        }
    }
}
