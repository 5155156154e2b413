pub mod user;
pub mod order;
pub mod holding;
pub mod position;
pub mod ledger;
pub mod watchlist;

pub use user::{CurrentUser, User};
pub use order::{Exchange, Order, OrderMode, OrderStatus, OrderType, Product, Settlement};
pub use holding::Holding;
pub use position::Position;
pub use ledger::{LedgerEntry, LedgerKind, LedgerStatus};
pub use watchlist::WatchlistItem;
