pub mod list_packages;
pub mod reload;
pub mod search;

pub use list_packages::*;
pub use reload::*;
pub use search::*;
