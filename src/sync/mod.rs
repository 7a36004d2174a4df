//! Poller/synchronizer: keeps per-page view state fresh without losing
//! previously displayed data on transient failure

pub mod poller;
pub mod view_state;

pub use poller::{spawn, FetchCycle, PollHandle, SharedViewState};
pub use view_state::ViewState;
