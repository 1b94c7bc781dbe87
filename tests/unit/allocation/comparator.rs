//! Allocation comparison against the default 50/30/20 targets

use macrowatch::allocation::{parse_allocation_csv, AllocationComparator};
use macrowatch::error::AllocationError;
use macrowatch::models::allocation::{AllocationReport, AllocationStatus};

fn compare_csv(csv: &str) -> Result<AllocationReport, AllocationError> {
    let rows = parse_allocation_csv(csv)?;
    AllocationComparator::default().compare(&rows)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.005
}

#[test]
fn documented_example_is_off_target() {
    let report =
        compare_csv("Asset Class,Amount\nStocks,500000\nBonds,300000\nPrivate,100000\n").unwrap();

    assert_eq!(report.total, 900_000.0);
    let pct: Vec<f64> = report.rows.iter().map(|r| r.current_pct).collect();
    assert!(approx(pct[0], 55.56) && approx(pct[1], 33.33) && approx(pct[2], 11.11));
    let dev: Vec<f64> = report.rows.iter().filter_map(|r| r.deviation).collect();
    assert!(approx(dev[0], 5.56) && approx(dev[1], 3.33) && approx(dev[2], -8.89));

    let statuses: Vec<AllocationStatus> = report.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            AllocationStatus::OffTarget,
            AllocationStatus::Ok,
            AllocationStatus::OffTarget
        ]
    );
    assert!(!report.aligned);
}

#[test]
fn deviation_of_exactly_tolerance_is_ok() {
    let report = compare_csv("Asset Class,Amount\nStocks,55\nBonds,30\nPrivate,15\n").unwrap();
    assert_eq!(report.rows[0].deviation, Some(5.0));
    assert_eq!(report.rows[2].deviation, Some(-5.0));
    assert!(report.rows.iter().all(|r| r.status == AllocationStatus::Ok));
    assert!(report.aligned);
}

#[test]
fn deviation_just_past_tolerance_is_off_target() {
    let report =
        compare_csv("Asset Class,Amount\nStocks,5501\nBonds,3000\nPrivate,1499\n").unwrap();
    assert!(approx(report.rows[0].deviation.unwrap(), 5.01));
    assert_eq!(report.rows[0].status, AllocationStatus::OffTarget);
    assert_eq!(report.rows[1].status, AllocationStatus::Ok);
    assert_eq!(report.rows[2].status, AllocationStatus::OffTarget);
}

#[test]
fn unknown_asset_class_gets_unknown_status() {
    let report = compare_csv(
        "Asset Class,Amount\nStocks,500000\nBonds,300000\nPrivate,100000\nCrypto,100000\n",
    )
    .unwrap();

    assert_eq!(report.total, 1_000_000.0);
    let crypto = &report.rows[3];
    assert_eq!(crypto.asset_class, "Crypto");
    assert!(approx(crypto.current_pct, 10.0));
    assert_eq!(crypto.target_pct, None);
    assert_eq!(crypto.deviation, None);
    assert_eq!(crypto.status, AllocationStatus::Unknown);

    assert_eq!(report.rows[0].status, AllocationStatus::Ok);
    assert_eq!(report.rows[1].status, AllocationStatus::Ok);
    assert_eq!(report.rows[2].status, AllocationStatus::OffTarget);
    assert!(!report.aligned);
}

#[test]
fn only_unknown_classes_stay_aligned() {
    let report = compare_csv("Asset Class,Amount\nCrypto,1\nArt,1\n").unwrap();
    assert!(report.aligned);
}

#[test]
fn empty_upload_is_empty_input() {
    assert_eq!(
        compare_csv("Asset Class,Amount\n").unwrap_err(),
        AllocationError::EmptyInput { skipped_rows: 0 }
    );
}

#[test]
fn unparseable_amounts_are_counted() {
    let report =
        compare_csv("Asset Class,Amount\nStocks,500\nBonds,three hundred\nPrivate,200\n").unwrap();
    assert_eq!(report.skipped_rows, 1);
    assert_eq!(report.rows.len(), 2);
    assert!(approx(report.rows[0].current_pct, 500.0 / 7.0));
}
