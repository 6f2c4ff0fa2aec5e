pub mod bridge;
pub mod controller;
mod frames;
pub mod lookup;
pub mod session;

pub use bridge::forward_scans;
pub use controller::ScanController;
pub use lookup::{LookupOverrideGuard, ScopedLookupTable};
pub use session::{ScanSession, ScanTicket};
