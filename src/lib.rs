//! Core library for the energyplan-frames command line application.
//!
//! The library turns spreadsheet exports of EnergyPLAN simulation runs into
//! labelled hourly, monthly and yearly tables. IO adapters live under
//! [`energyplan::frames::io`], data representations inside
//! [`energyplan::frames::model`], the sheet reshaping pipeline in
//! [`energyplan::frames::normalize`] and [`energyplan::frames::aggregate`], and
//! multi-scenario handling under [`energyplan::frames::assemble`] and
//! [`energyplan::frames::report`]. Scenario input files are prepared through
//! [`energyplan::frames::scenario`].

pub mod energyplan;

pub use energyplan::frames::{
    FrameError, Result, aggregate, assemble, config, costs, error, io, model, normalize, report,
    scenario,
};
