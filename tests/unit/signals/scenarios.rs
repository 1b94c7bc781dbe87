//! End-to-end market scenarios through the signal engine

use macrowatch::config::{Config, Thresholds};
use macrowatch::models::indicators::{Indicator, Snapshot};
use macrowatch::models::plan::Plan;
use macrowatch::models::signal::SignalStatus;
use macrowatch::signals::aggregation::PlanVerdict;
use macrowatch::signals::engine::SignalEngine;
use macrowatch::signals::scoring::RiskLevel;
use macrowatch::strategies::rules::{ids, RuleSet};

fn snapshot(pairs: &[(Indicator, f64)]) -> Snapshot {
    pairs
        .iter()
        .try_fold(Snapshot::new(), |s, (indicator, value)| s.with(*indicator, *value))
        .expect("finite test values")
}

fn recovery_snapshot(cpi: f64) -> Snapshot {
    snapshot(&[
        (Indicator::Vix, 15.0),
        (Indicator::SpPrice, 4500.0),
        (Indicator::SpMa200, 4300.0),
        (Indicator::Treasury10y, 4.5),
        (Indicator::Treasury3m, 4.0),
        (Indicator::CpiYoy, cpi),
    ])
}

#[test]
fn recovery_is_full_reentry() {
    let report = SignalEngine::default().evaluate(&recovery_snapshot(3.0));
    let reentry = &report.plans[&Plan::Reentry];
    assert_eq!(reentry.score, 4);
    assert_eq!(reentry.max_score, 4);
    assert_eq!(reentry.verdict, PlanVerdict::FullReentry);
}

#[test]
fn sticky_inflation_downgrades_to_phased_reentry() {
    let report = SignalEngine::default().evaluate(&recovery_snapshot(4.0));
    let reentry = &report.plans[&Plan::Reentry];
    assert_eq!(reentry.score, 3);
    assert_eq!(reentry.verdict, PlanVerdict::PhasedReentry);
}

#[test]
fn stressed_market_is_strong_risk_signal() {
    let stressed = snapshot(&[
        (Indicator::Vix, 25.0),
        (Indicator::SpPrice, 4000.0),
        (Indicator::SpMa200, 4300.0),
        (Indicator::Treasury10y, 3.0),
        (Indicator::Treasury3m, 5.0),
    ]);
    let report = SignalEngine::default().evaluate(&stressed);

    assert_eq!(report.risk.score, 3);
    assert_eq!(report.risk.unknown, 0);
    assert_eq!(report.risk.level, RiskLevel::Strong);
    // VIX exactly at the severe threshold does not trigger it.
    let severe = report
        .results
        .iter()
        .find(|r| r.rule_id == ids::VIX_SEVERE)
        .unwrap();
    assert_eq!(severe.status, SignalStatus::Ok);
    assert_eq!(report.plans[&Plan::Reentry].verdict, PlanVerdict::Hold);
}

#[test]
fn one_result_per_rule_in_declaration_order() {
    let engine = SignalEngine::default();
    let inputs = [
        Snapshot::new(),
        recovery_snapshot(3.0),
        snapshot(&[(Indicator::Gscpi, 2.0), (Indicator::CdsSpreadBps, 80.0)]),
    ];

    for input in &inputs {
        let report = engine.evaluate(input);
        let ids: Vec<&str> = report.results.iter().map(|r| r.rule_id.as_str()).collect();
        let expected: Vec<&str> = engine.rules().rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, expected);
    }
}

#[test]
fn absent_inputs_are_never_alert_or_ok() {
    let partial = snapshot(&[(Indicator::SpPrice, 4000.0), (Indicator::Vix, 30.0)]);
    let report = SignalEngine::default().evaluate(&partial);

    for result in &report.results {
        if result.missing.is_empty() {
            assert_ne!(result.status, SignalStatus::Unknown, "{}", result.rule_id);
        } else {
            assert_eq!(result.status, SignalStatus::Unknown, "{}", result.rule_id);
            assert_eq!(result.triggered, None);
        }
    }
    let sp_rule = report
        .results
        .iter()
        .find(|r| r.rule_id == ids::SP_BELOW_MA200)
        .unwrap();
    assert_eq!(sp_rule.missing, vec![Indicator::SpMa200]);
}

#[test]
fn evaluation_is_idempotent() {
    let engine = SignalEngine::default();
    let input = recovery_snapshot(3.7);
    assert_eq!(engine.evaluate(&input), engine.evaluate(&input));
}

#[test]
fn engine_is_shareable_across_tasks() {
    let engine = std::sync::Arc::new(SignalEngine::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine
                    .evaluate(&recovery_snapshot(3.0 + i as f64 * 0.5))
                    .plans[&Plan::Reentry]
                    .score
            })
        })
        .collect();
    let scores: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(scores, vec![4, 3, 3, 3]);
}

#[test]
fn overridden_thresholds_change_labels_and_outcomes() {
    let config = Config {
        thresholds: Thresholds {
            vix_elevated: 30.0,
            ..Thresholds::default()
        },
        ..Config::default()
    };
    let engine = SignalEngine::from_config(&config);
    let report = engine.evaluate(&snapshot(&[(Indicator::Vix, 25.0)]));

    let elevated = &report.results[0];
    assert_eq!(elevated.label, "VIX>30");
    assert_eq!(elevated.status, SignalStatus::Ok);
    assert_eq!(RuleSet::standard(&config.thresholds).len(), engine.rules().len());
}

#[test]
fn china_selloff_monitor_reads_treasury_dollar_and_holdings() {
    let report = SignalEngine::default().evaluate(&snapshot(&[
        (Indicator::Treasury10y, 5.3),
        (Indicator::Dxy3moChangePct, -6.0),
        (Indicator::ChinaHoldingsDropUsdB, 40.0),
    ]));
    let china = &report.plans[&Plan::ChinaSelloff];
    assert_eq!(china.score, 2);
    assert_eq!(china.unknown, 0);
    assert_eq!(china.verdict, PlanVerdict::Active);
    assert_eq!(report.plans[&Plan::DebtCrisis].score, 2);
    assert!(!report.plans.contains_key(&Plan::Allocation503020));
}
