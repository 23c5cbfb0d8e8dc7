// Domain data shapes shared across the pipeline layers:
// raw (append-only ingested rows) -> staged (deduplicated, cleaned) ->
// enriched (joined) -> marts (aggregated dimensions and facts).

pub mod enriched;
pub mod marts;
pub mod raw;
pub mod staged;

pub use enriched::{CustomerSnapshot, EnrichedOrder, ProductSnapshot};
pub use marts::{
    ActivityStatus, CustomerDimension, CustomerSegment, FactOrder, OrderValueTier, PriceSegment,
    ProductDimension, SalesTier,
};
pub use raw::{RawCustomer, RawOrder, RawProduct};
pub use staged::{Customer, Order, Product};
