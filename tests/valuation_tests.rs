use papertrade::services::valuation::{round2, valuate, PortfolioSummary};

#[test]
fn valuate_computes_pnl_against_live_price() {
    // Holding{qty:10, avg:100} with livePrice 110 and day change 2.
    let v = valuate(10, 100.0, 100.0, 110.0, 2.0);

    assert_eq!(v.investment, 1000.0);
    assert_eq!(v.current_value, 1100.0);
    assert_eq!(v.pnl, 100.0);
    assert_eq!(round2(v.pnl_percentage), 10.00);
    assert_eq!(v.day_pnl, 20.0);
    assert_eq!(round2(v.day_pnl_percentage), 2.00);
    assert!(!v.is_loss);
}

#[test]
fn valuate_flags_loss_when_price_drops() {
    let v = valuate(5, 200.0, 200.0, 180.0, -3.0);

    assert_eq!(v.investment, 1000.0);
    assert_eq!(v.current_value, 900.0);
    assert_eq!(v.pnl, -100.0);
    assert!(v.is_loss);
    assert_eq!(v.day_pnl, -15.0);
}

#[test]
fn valuate_zero_investment_has_zero_percentage() {
    let v = valuate(10, 0.0, 0.0, 50.0, 1.0);

    assert_eq!(v.investment, 0.0);
    assert_eq!(v.pnl_percentage, 0.0);
    // last_price 0 guards the day percentage as well
    assert_eq!(v.day_pnl_percentage, 0.0);
}

#[test]
fn valuate_zero_qty_is_all_zeroes() {
    let v = valuate(0, 100.0, 100.0, 110.0, 2.0);

    assert_eq!(v.investment, 0.0);
    assert_eq!(v.current_value, 0.0);
    assert_eq!(v.pnl, 0.0);
    assert!(!v.is_loss);
}

#[test]
fn portfolio_summary_accumulates_and_derives_percentage() {
    let mut summary = PortfolioSummary::default();

    summary.add(&valuate(10, 100.0, 100.0, 110.0, 2.0)); // pnl +100 on 1000
    summary.add(&valuate(5, 200.0, 200.0, 190.0, -1.0)); // pnl -50 on 1000

    assert_eq!(summary.total_investment, 2000.0);
    assert_eq!(summary.total_current_value, 2050.0);
    assert_eq!(summary.total_pnl, 50.0);
    assert_eq!(round2(summary.total_pnl_percentage()), 2.5);
    assert_eq!(summary.total_day_pnl, 15.0);
}

#[test]
fn portfolio_summary_empty_has_zero_percentage() {
    let summary = PortfolioSummary::default();
    assert_eq!(summary.total_pnl_percentage(), 0.0);
}

#[test]
fn round2_keeps_two_decimals() {
    assert_eq!(round2(10.004), 10.0);
    assert_eq!(round2(10.006), 10.01);
    assert_eq!(round2(-2.346), -2.35);
    assert_eq!(round2(480.0), 480.0);
}
