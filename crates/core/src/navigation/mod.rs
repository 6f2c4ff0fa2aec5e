pub mod base;
pub mod boot;
pub mod dispatcher;
pub mod path;

pub use base::BasePathResolver;
pub use boot::{BootDecision, guard_physical_location};
pub use dispatcher::{NavigationContext, NavigationDispatcher};
pub use path::{join_prefixed, normalize_path};
