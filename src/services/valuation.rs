//! Pure P&L math shared by the holdings, positions, and summary read paths.
//!
//! Everything here is deterministic and IO-free. Values are carried at full
//! floating precision; `round2` is applied only when a number crosses into a
//! serialized view.

/// Per-item valuation against a live price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub investment: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percentage: f64,
    pub day_pnl: f64,
    pub day_pnl_percentage: f64,
    pub is_loss: bool,
}

pub fn valuate(qty: i64, avg: f64, last_price: f64, live_price: f64, change: f64) -> Valuation {
    let qty = qty as f64;

    let investment = avg * qty;
    let current_value = live_price * qty;
    let pnl = current_value - investment;
    let pnl_percentage = if investment > 0.0 {
        pnl / investment * 100.0
    } else {
        0.0
    };

    let day_pnl = change * qty;
    let day_pnl_percentage = if last_price > 0.0 {
        change / last_price * 100.0
    } else {
        0.0
    };

    Valuation {
        investment,
        current_value,
        pnl,
        pnl_percentage,
        day_pnl,
        day_pnl_percentage,
        is_loss: pnl < 0.0,
    }
}

/// Running totals across a portfolio of valuated items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioSummary {
    pub total_investment: f64,
    pub total_current_value: f64,
    pub total_pnl: f64,
    pub total_day_pnl: f64,
}

impl PortfolioSummary {
    pub fn add(&mut self, v: &Valuation) {
        self.total_investment += v.investment;
        self.total_current_value += v.current_value;
        self.total_pnl += v.pnl;
        self.total_day_pnl += v.day_pnl;
    }

    pub fn total_pnl_percentage(&self) -> f64 {
        if self.total_investment > 0.0 {
            self.total_pnl / self.total_investment * 100.0
        } else {
            0.0
        }
    }
}

/// Presentation rounding to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
