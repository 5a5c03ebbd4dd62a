mod dialog;
mod fs;
mod store;
mod streamduck;
mod window;

pub use dialog::*;
pub use fs::*;
pub use store::*;
pub use streamduck::*;
pub use window::*;
