//! # StockSync Stock
//!
//! The stock-status resolution engine: everything needed to answer *"is this
//! product currently salable in a given stock scope?"* for downstream search
//! indexing.
//!
//! # Components
//!
//! - [`scope::StockScopeResolver`]: website/store → stock scope, with a
//!   never-failing boundary that falls back to the default scope.
//! - [`reader::StockDataReader`]: raw salability/quantity rows for a product
//!   set, selecting between the global table and the per-scope index table.
//! - [`composite::CompositeStockResolver`]: the composite-product rule —
//!   configurable and bundle salability derived from the global flag *and*
//!   per-scope child aggregation, because the host platform's own indexes
//!   reflect only one of the two.
//! - [`status::StockStatusById`]: bulk salability façade over the host
//!   inventory predicate.
//! - [`join::ParentStockJoinPlanner`]: decides how a catalog export SELECT
//!   should join parent stock, as a plan value the host query builder
//!   applies.
//!
//! # Data Flow
//!
//! ```text
//! website/store id ──▶ StockScopeResolver ──▶ StockId
//!                                               │
//! product ids ──▶ StockDataReader ◀─────────────┘
//!                      │   (global table by id / scope table by SKU)
//!                      ▼
//!            CompositeStockResolver ──▶ salable: bool
//! ```

pub mod composite;
pub mod join;
pub mod reader;
pub mod scope;
pub mod status;

pub use composite::CompositeStockResolver;
pub use join::{ParentStockJoinPlanner, StockJoinKey, StockJoinPlan, StockJoinType};
pub use reader::StockDataReader;
pub use scope::StockScopeResolver;
pub use status::StockStatusById;
