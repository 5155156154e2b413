use papertrade::services::funds_service::FundsBreakdown;

#[test]
fn available_balance_identity() {
    let bd = FundsBreakdown {
        total_added: 5000.0,
        total_withdrawn: 1200.0,
        total_investment: 2500.0,
    };

    assert_eq!(bd.total_funds(), 3800.0);
    assert_eq!(bd.available_balance(), 1300.0);
}

#[test]
fn sell_after_externally_funded_buy_goes_negative() {
    // BUY 10 @ 100 funded outside the ledger books a 1000 investment;
    // SELL 4 @ 120 credits 480. Available balance is allowed negative.
    let bd = FundsBreakdown {
        total_added: 480.0,
        total_withdrawn: 0.0,
        total_investment: 1000.0,
    };

    assert_eq!(bd.total_funds(), 480.0);
    assert_eq!(bd.available_balance(), -520.0);
}

#[test]
fn empty_ledger_balances_are_zero() {
    let bd = FundsBreakdown::default();
    assert_eq!(bd.total_funds(), 0.0);
    assert_eq!(bd.available_balance(), 0.0);
}
