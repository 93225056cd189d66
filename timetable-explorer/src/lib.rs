//! Timetable explorer.
//!
//! Loads a normalized RailML timetable into a wired model of stations,
//! operating-day calendars, train parts and trains, and answers the
//! question: "which trains run, on which days, and how do they share
//! train parts?"

pub mod course;
pub mod document;
pub mod domain;
pub mod filter;
pub mod hints;
pub mod model;
pub mod report;
pub mod store;

#[cfg(test)]
mod fixtures;
