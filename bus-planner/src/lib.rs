//! Bus route planner.
//!
//! Loads a city's bus timetables into one network per calendar and answers
//! "how do I get from this stop to that one, leaving now?" in three modes:
//! fewest rides, least elapsed time, and earliest arrival without leaving
//! earlier than needed.

pub mod cache;
pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod snapshot;
pub mod timetable;
pub mod web;
