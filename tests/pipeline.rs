//! Transcript -> records -> script files, end to end on a temp directory.

use std::fs;

use definer::ddl::{decompose, Algorithm};
use definer::emit::{emit_all, EmitOptions, EMPTY_PLACEHOLDER};
use definer::report::{parse_report_str, TranscriptWriter};
use definer::DefinerError;
use pretty_assertions::assert_eq;

const V_ORDERS: &str = "CREATE ALGORITHM=UNDEFINED DEFINER=`report`@`%` SQL SECURITY DEFINER VIEW `v_orders` AS select `id` from `orders` where `paid` = 1";
const V_TOTALS: &str = "CREATE ALGORITHM=UNDEFINED DEFINER=`app`@`localhost` SQL SECURITY INVOKER VIEW `v_totals` AS select sum(`total`) AS `total` from `orders`";

fn transcript(with_alter: bool) -> String {
    let mut out = TranscriptWriter::new(Vec::new());
    out.connected("db-01", "ip-10-0-0-1").unwrap();
    out.server("db-01", "sales").unwrap();

    out.object("v_orders").unwrap();
    out.create_statement("v_orders", "VIEW", V_ORDERS).unwrap();
    if with_alter {
        let alter = decompose(V_ORDERS)
            .unwrap()
            .compose("sales", "v_orders", Algorithm::Merge);
        out.alter_statement(&alter).unwrap();
    }

    out.object("v_totals").unwrap();
    out.create_statement("v_totals", "VIEW", V_TOTALS).unwrap();

    String::from_utf8(out.into_inner()).unwrap()
}

#[test]
fn test_dump_output_becomes_script_pairs() {
    let records = parse_report_str(&transcript(true));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].server, "db-01");
    assert_eq!(records[1].database, "sales");

    let dir = tempfile::tempdir().unwrap();
    let summary = emit_all(&records, dir.path(), &EmitOptions::default());

    assert!(summary.is_clean());
    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.empty, vec!["sales.v_totals".to_string()]);

    let forward = fs::read_to_string(dir.path().join("sales/Vv_orders.sql")).unwrap();
    assert!(forward.starts_with("-- Flyway Migration Script\n-- Database: sales\n-- View: v_orders\n"));
    assert!(forward.contains("ALGORITHM = MERGE"));
    assert!(forward.contains("DEFINER=`report`@`%`"));

    let rollback = fs::read_to_string(dir.path().join("sales/Uv_orders.sql")).unwrap();
    assert!(rollback.starts_with("-- Flyway Undo Script (Rollback)"));
    assert!(rollback.contains("CREATE OR REPLACE"));
    assert!(rollback.contains("ALGORITHM = UNDEFINED"));
    assert!(!rollback.contains("ALGORITHM = MERGE"));

    let placeholder = fs::read_to_string(dir.path().join("sales/Vv_totals.sql")).unwrap();
    assert!(placeholder.contains(EMPTY_PLACEHOLDER));
}

#[test]
fn test_target_algorithm_recomposes_from_create() {
    let records = parse_report_str(&transcript(false));
    let dir = tempfile::tempdir().unwrap();
    let options = EmitOptions {
        target: Some(Algorithm::Merge),
        ..EmitOptions::default()
    };

    let summary = emit_all(&records, dir.path(), &options);
    assert!(summary.is_clean());
    assert!(summary.empty.is_empty());

    let forward = fs::read_to_string(dir.path().join("sales/Vv_totals.sql")).unwrap();
    assert!(forward.contains("SQL SECURITY INVOKER"));
    assert!(forward.contains("VIEW `sales`.`v_totals`"));
}

#[test]
fn test_bad_view_does_not_stop_batch() {
    let mut out = TranscriptWriter::new(Vec::new());
    out.server("db-01", "sales").unwrap();
    out.object("v_broken").unwrap();
    out.create_statement("v_broken", "VIEW", "CREATE VIEW `v_broken` AS select 1")
        .unwrap();
    out.object("v_orders").unwrap();
    out.create_statement("v_orders", "VIEW", V_ORDERS).unwrap();
    let records = parse_report_str(&String::from_utf8(out.into_inner()).unwrap());

    let dir = tempfile::tempdir().unwrap();
    let options = EmitOptions {
        target: Some(Algorithm::Merge),
        ..EmitOptions::default()
    };
    let summary = emit_all(&records, dir.path(), &options);

    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(
        &summary.failures[0],
        DefinerError::Object { name, .. } if name == "v_broken"
    ));
    assert_eq!(summary.written.len(), 1);
    assert!(dir.path().join("sales/Vv_orders.sql").exists());
    assert!(!dir.path().join("sales/Vv_broken.sql").exists());
}

#[test]
fn test_second_run_needs_overwrite() {
    let records = parse_report_str(&transcript(true));
    let dir = tempfile::tempdir().unwrap();

    let first = emit_all(&records, dir.path(), &EmitOptions::default());
    assert!(first.is_clean());

    let second = emit_all(&records, dir.path(), &EmitOptions::default());
    assert_eq!(second.failures.len(), 4);
    assert!(second.written.is_empty());
    assert!(second
        .failures
        .iter()
        .all(|e| matches!(e, DefinerError::Io { .. })));

    let forced = EmitOptions {
        overwrite: true,
        ..EmitOptions::default()
    };
    let third = emit_all(&records, dir.path(), &forced);
    assert!(third.is_clean());
    assert_eq!(third.written.len(), 2);
}
