#[macro_use]
extern crate tracing;

mod app;
mod logging;

pub use app::run;
pub use logging::{
    init_errors,
    init_logging,
};
