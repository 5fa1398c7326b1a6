//! Cabin booking: pricing, refunds, availability and the booking flows.

pub mod availability;
pub mod calculators;
pub mod guard;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use calculators::{
    price_breakdown, refund_quote, round_money, AddOn, AddOnSelection, PriceBreakdown, RefundQuote,
};
pub use guard::SubmissionGuard;
pub use routes::router;
