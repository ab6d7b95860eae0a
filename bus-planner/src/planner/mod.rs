//! Route engine.
//!
//! This module answers route queries over a `TransitNetwork` snapshot in
//! three modes: fewest departures (shortest), least elapsed time (fastest)
//! and earliest arrival without leaving earlier than needed (foremost).
//!
//! All modes share one label-setting search, parameterized by a
//! `SearchPolicy` (which hops are usable, what they cost, and which labels
//! make others redundant) and by a `GraphView` (which way edges point).
//! Foremost runs over a reversed view.

mod config;
mod engine;
mod policy;
mod search;


pub use config::SearchConfig;
pub use engine::{InvalidMode, Mode, RouteEngine, RouteError, SearchRequest, SearchResult};
pub use policy::{Fastest, Foremost, LabelKey, PlanCost, SearchPolicy, Shortest};
