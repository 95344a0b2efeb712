//! Report aggregation: folds a flat report history into one display record
//! per pharmacy.
//!
//! [`aggregate`] is a pure function of `(reports, now)`. It is re-run over
//! the full report slice on every request or batch job; nothing is patched
//! incrementally.

mod aggregate;
mod notes;
mod summary;
mod trend;
mod types;

pub use aggregate::{aggregate, nearest_first};
pub use notes::{compact_notes, BEST_TO_CALL_AHEAD, LONG_WAIT_TIMES, STOCK_OUT_NOTE};
pub use summary::{summarize, DashboardSummary};
pub use trend::{classify_trend, TREND_WINDOW_DAYS};
pub use types::{AggregatedPharmacy, Status, Trend};
