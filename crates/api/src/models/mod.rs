pub mod navigation;
pub mod route;
pub mod scan;

pub use navigation::*;
pub use route::*;
pub use scan::*;
