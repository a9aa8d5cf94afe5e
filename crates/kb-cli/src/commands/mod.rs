//! Command implementations

pub mod load;
pub mod setup;
pub mod status;
pub mod update;

pub use load::run_load;
pub use setup::run_setup;
pub use status::run_status;
pub use update::run_update;
