//! Public transport departure board.
//!
//! Polls the ResRobot trip API for a set of configured routes, merges the
//! next departures into one time-ordered list and hands it to a display.

pub mod config;
pub mod display;
pub mod domain;
pub mod resrobot;
pub mod scheduler;
pub mod web;
