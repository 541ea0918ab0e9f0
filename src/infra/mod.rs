mod data_dir;
mod logging;
mod store;

pub use data_dir::*;
pub use logging::*;
pub use store::*;
