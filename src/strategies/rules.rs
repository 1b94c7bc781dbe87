//! The single declarative rule table shared by every view and report.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::models::indicators::Indicator;
use crate::models::plan::Plan;
use crate::models::strategy::{Comparison, Condition, Rule};

/// Stable rule identifiers referenced by aggregations.
pub mod ids {
    pub const VIX_ELEVATED: &str = "vix_elevated";
    pub const VIX_SEVERE: &str = "vix_severe";
    pub const VIX_CALM: &str = "vix_calm";
    pub const SP_BELOW_MA200: &str = "sp_below_ma200";
    pub const SP_CORRECTION: &str = "sp_correction";
    pub const SP_ABOVE_MA200: &str = "sp_above_ma200";
    pub const CURVE_INVERTED: &str = "curve_inverted";
    pub const CURVE_NORMALIZED: &str = "curve_normalized";
    pub const CPI_HIGH: &str = "cpi_high";
    pub const CPI_STABLE: &str = "cpi_stable";
    pub const HY_OAS_WIDE: &str = "hy_oas_wide";
    pub const GDP_CONTRACTION: &str = "gdp_contraction";
    pub const LEI_WEAK: &str = "lei_weak";
    pub const TREASURY_10Y_HIGH: &str = "treasury_10y_high";
    pub const DXY_DECLINE: &str = "dxy_decline";
    pub const CDS_WIDE: &str = "cds_wide";
    pub const GSCPI_HIGH: &str = "gscpi_high";
    pub const TRADE_DEFICIT_WIDE: &str = "trade_deficit_wide";
    pub const EEM_OUTPERFORMANCE: &str = "eem_outperformance";
    pub const COMMODITY_RALLY: &str = "commodity_rally";
    pub const CHINA_TREASURY_10Y_HIGH: &str = "china_treasury_10y_high";
    pub const CHINA_DXY_DECLINE: &str = "china_dxy_decline";
    pub const CHINA_HOLDINGS_DROP: &str = "china_holdings_drop";
}

/// Immutable, ordered rule table. Evaluation order is declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn standard(t: &Thresholds) -> Self {
        use Indicator::*;

        let correction_factor = 1.0 - t.sp_correction_pct / 100.0;

        let rules = vec![
            rule(
                ids::VIX_ELEVATED,
                format!("VIX>{}", num(t.vix_elevated)),
                Condition::above(Vix, t.vix_elevated),
                Plan::MarketDynamics2025,
                "Rotate into real assets / floating-rate",
            ),
            rule(
                ids::VIX_SEVERE,
                format!("VIX>{}", num(t.vix_severe)),
                Condition::above(Vix, t.vix_severe),
                Plan::TaxDefensive,
                "Rebalance tax-advantaged accounts",
            ),
            rule(
                ids::VIX_CALM,
                format!("VIX<{}", num(t.vix_calm)),
                Condition::below(Vix, t.vix_calm),
                Plan::Reentry,
                "Begin phased re-entry",
            ),
            rule(
                ids::SP_BELOW_MA200,
                "SP<MA200".to_string(),
                Condition::relative(SpPrice, Comparison::LessThan, SpMa200, 1.0),
                Plan::MarketDynamics2025,
                "Shift to value/dividend",
            ),
            rule(
                ids::SP_CORRECTION,
                format!("SPCorrection>{}%", num(t.sp_correction_pct)),
                Condition::relative(SpPrice, Comparison::LessThan, SpMa200, correction_factor),
                Plan::TaxDefensive,
                "Harvest losses, shorten duration",
            ),
            rule(
                ids::SP_ABOVE_MA200,
                "SP>MA200".to_string(),
                Condition::relative(SpPrice, Comparison::GreaterThan, SpMa200, 1.0),
                Plan::Reentry,
                "Trend recovery confirmed",
            ),
            rule(
                ids::CURVE_INVERTED,
                "CurveInverted".to_string(),
                Condition::relative(Treasury10y, Comparison::LessThan, Treasury3m, 1.0),
                Plan::MarketDynamics2025,
                "Add gold, reduce long bonds",
            ),
            rule(
                ids::CURVE_NORMALIZED,
                "CurveNormalized".to_string(),
                Condition::relative(Treasury10y, Comparison::GreaterThan, Treasury3m, 1.0),
                Plan::Reentry,
                "Resume intermediate bonds",
            ),
            rule(
                ids::CPI_HIGH,
                format!("CPI>{}%", num(t.cpi_high)),
                Condition::above(CpiYoy, t.cpi_high),
                Plan::MarketDynamics2025,
                "Add TIPS/commodities",
            ),
            rule(
                ids::CPI_STABLE,
                format!("CPI<{}%", num(t.cpi_stable)),
                Condition::below(CpiYoy, t.cpi_stable),
                Plan::Reentry,
                "Reduce inflation hedges",
            ),
            rule(
                ids::HY_OAS_WIDE,
                format!("HYOAS>{}bps", num(t.hy_oas_bps)),
                Condition::above(HyOasBps, t.hy_oas_bps),
                Plan::MarketDynamics2025,
                "Reduce high-yield exposure",
            ),
            rule(
                ids::GDP_CONTRACTION,
                format!("GDP<{}", num(t.gdp_floor)),
                Condition::below(GdpGrowth, t.gdp_floor),
                Plan::TaxDefensive,
                "Increase liquidity buffer",
            ),
            rule(
                ids::LEI_WEAK,
                format!("LEI<{}", num(t.lei_floor)),
                Condition::below(Lei, t.lei_floor),
                Plan::TaxDefensive,
                "Lock in 24-month cash cushion",
            ),
            rule(
                ids::TREASURY_10Y_HIGH,
                format!("10Y>{}%", num(t.treasury_10y_ceiling)),
                Condition::above(Treasury10y, t.treasury_10y_ceiling),
                Plan::DebtCrisis,
                "Exit long bonds, add private credit",
            ),
            rule(
                ids::DXY_DECLINE,
                format!("DXY↓>{}%", num(t.dxy_drop_pct)),
                Condition::below(Dxy3moChangePct, -t.dxy_drop_pct),
                Plan::DebtCrisis,
                "Add gold/foreign assets",
            ),
            rule(
                ids::CDS_WIDE,
                format!("CDS>{}bps", num(t.cds_bps)),
                Condition::above(CdsSpreadBps, t.cds_bps),
                Plan::DebtCrisis,
                "Add private credit",
            ),
            rule(
                ids::GSCPI_HIGH,
                format!("GSCPI>{}", num(t.gscpi)),
                Condition::above(Gscpi, t.gscpi),
                Plan::TradeShift,
                "Add U.S. infrastructure/reshoring",
            ),
            rule(
                ids::TRADE_DEFICIT_WIDE,
                format!("TradeDeficit>${}B", num(t.trade_deficit_usd_b)),
                Condition::above(TradeDeficitUsdB, t.trade_deficit_usd_b),
                Plan::TradeShift,
                "Add exporters/FX hedges",
            ),
            rule(
                ids::EEM_OUTPERFORMANCE,
                format!("EEM>SPY+{}%", num(t.eem_outperformance_pct)),
                Condition::above(EemVsSpy3moPct, t.eem_outperformance_pct),
                Plan::TradeShift,
                "Add EM exposure",
            ),
            rule(
                ids::COMMODITY_RALLY,
                format!("Commodities+{}%", num(t.commodity_rally_pct)),
                Condition::above(Commodity3moChangePct, t.commodity_rally_pct),
                Plan::TradeShift,
                "Add commodity exposure",
            ),
            rule(
                ids::CHINA_TREASURY_10Y_HIGH,
                format!("10Y>{}%", num(t.treasury_10y_ceiling)),
                Condition::above(Treasury10y, t.treasury_10y_ceiling),
                Plan::ChinaSelloff,
                "Exit long bonds, add floating-rate",
            ),
            rule(
                ids::CHINA_DXY_DECLINE,
                format!("DXY↓>{}%", num(t.dxy_drop_pct)),
                Condition::below(Dxy3moChangePct, -t.dxy_drop_pct),
                Plan::ChinaSelloff,
                "Add foreign equities, gold, global bonds",
            ),
            rule(
                ids::CHINA_HOLDINGS_DROP,
                format!("ChinaHoldings↓>${}B", num(t.china_holdings_drop_usd_b)),
                Condition::above(ChinaHoldingsDropUsdB, t.china_holdings_drop_usd_b),
                Plan::ChinaSelloff,
                "Hedge U.S. bond exposure",
            ),
        ];

        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn for_plan(&self, plan: Plan) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |r| r.plan == plan)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard(&Thresholds::default())
    }
}

fn rule(id: &str, label: String, condition: Condition, plan: Plan, action: &str) -> Rule {
    Rule {
        id: id.to_string(),
        label,
        condition,
        plan,
        action: action.to_string(),
    }
}

/// Shortest decimal form: 20.0 -> "20", 3.5 -> "3.5".
fn num(value: f64) -> String {
    format!("{}", value)
}
