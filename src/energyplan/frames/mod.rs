pub mod aggregate;
pub mod assemble;
pub mod config;
pub mod costs;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod report;
pub mod scenario;

pub use error::{FrameError, Result};
