use papertrade::models::{OrderMode, OrderType, Product, Settlement};
use papertrade::services::order_service::{merge_buy, order_total};

#[test]
fn merge_buy_accumulates_quantity_weighted_average() {
    // 10 @ 100, then 10 @ 120 => 20 @ 110
    let (qty, avg) = merge_buy(10, 100.0, 10, 120.0);
    assert_eq!(qty, 20);
    assert_eq!(avg, 110.0);
}

#[test]
fn merge_buy_is_order_independent() {
    // The same fills in any order land on the same (qty, avg).
    let fills = [(10_i64, 100.0_f64), (5, 150.0), (20, 90.0)];

    let fold = |order: &[usize]| {
        let (first_qty, first_price) = fills[order[0]];
        let mut qty = first_qty;
        let mut avg = first_price;
        for &i in &order[1..] {
            let (q, p) = fills[i];
            let merged = merge_buy(qty, avg, q, p);
            qty = merged.0;
            avg = merged.1;
        }
        (qty, avg)
    };

    let (q1, a1) = fold(&[0, 1, 2]);
    let (q2, a2) = fold(&[2, 0, 1]);
    let (q3, a3) = fold(&[1, 2, 0]);

    assert_eq!(q1, 35);
    assert_eq!(q1, q2);
    assert_eq!(q2, q3);

    // Weighted mean of (10*100 + 5*150 + 20*90) / 35
    let expected = (10.0 * 100.0 + 5.0 * 150.0 + 20.0 * 90.0) / 35.0;
    assert!((a1 - expected).abs() < 1e-9);
    assert!((a2 - expected).abs() < 1e-9);
    assert!((a3 - expected).abs() < 1e-9);
}

#[test]
fn merge_buy_avg_unchanged_at_same_price() {
    let (qty, avg) = merge_buy(6, 100.0, 4, 100.0);
    assert_eq!(qty, 10);
    assert_eq!(avg, 100.0);
}

#[test]
fn order_total_rounds_to_two_decimals() {
    assert_eq!(order_total(10, 100.0), 1000.0);
    assert_eq!(order_total(4, 120.0), 480.0);
    assert_eq!(order_total(3, 33.333), 100.0);
    assert_eq!(order_total(7, 0.142857), 1.0);
}

#[test]
fn mode_parse_is_case_insensitive() {
    assert_eq!(OrderMode::parse("buy"), Some(OrderMode::Buy));
    assert_eq!(OrderMode::parse("Sell"), Some(OrderMode::Sell));
    assert_eq!(OrderMode::parse(" BUY "), Some(OrderMode::Buy));
    assert_eq!(OrderMode::parse("hold"), None);
    assert_eq!(OrderMode::parse(""), None);
}

#[test]
fn product_settlement_split() {
    assert_eq!(Product::Cnc.settlement(), Settlement::Delivery);
    assert_eq!(Product::Mis.settlement(), Settlement::Intraday);
    assert_eq!(Product::Nrml.settlement(), Settlement::Intraday);
}

#[test]
fn product_parse_accepts_known_values_only() {
    assert_eq!(Product::parse("cnc"), Some(Product::Cnc));
    assert_eq!(Product::parse("MIS"), Some(Product::Mis));
    assert_eq!(Product::parse("nrml"), Some(Product::Nrml));
    assert_eq!(Product::parse("SPOT"), None);
}

#[test]
fn order_type_parse_covers_stop_loss_variants() {
    assert_eq!(OrderType::parse("market"), Some(OrderType::Market));
    assert_eq!(OrderType::parse("LIMIT"), Some(OrderType::Limit));
    assert_eq!(OrderType::parse("sl"), Some(OrderType::Sl));
    assert_eq!(OrderType::parse("SL-M"), Some(OrderType::SlM));
    assert_eq!(OrderType::parse("TRAIL"), None);
}
