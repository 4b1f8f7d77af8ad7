#![deny(warnings)]

//! Dashboard runtime: application state, command handling and chart surfaces.
//!
//! [`Dashboard`] owns the configuration, the active result and the saved
//! scenarios, and answers every command with the redraws it requires.
//! [`ChartBoard`] applies those redraws to one surface per metric family.

mod board;
mod dashboard;

pub use board::{sketch, ChartBoard, ChartSurface, LiveChart, RenderStats};
pub use dashboard::{
    ActiveResult, ChartMode, Command, Dashboard, DashboardError, ErrorKind, Redraw, RunTicket,
};
