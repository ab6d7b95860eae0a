//! Domain types for the bus route planner.
//!
//! This module contains the core value types: stops, times, scheduled
//! departures and journeys. All types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod calendar;
mod departure;
mod error;
mod journey;
mod stop;
mod time;

pub use calendar::{Calendar, InvalidCalendar};
pub use departure::{Departure, LineId};
pub use error::DomainError;
pub use journey::Journey;
pub use stop::{InvalidStopName, Stop};
pub use time::{ClockTime, TimeError};
