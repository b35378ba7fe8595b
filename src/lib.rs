pub mod config;
pub mod dom;
pub mod highlight;
pub mod locate;
pub mod net;
pub mod schedule;
pub mod session;
pub mod viewer;

pub use config::SearchConfig;
pub use net::{Match, SearchBackend, SearchError};
pub use session::{SearchSession, SearchState};
pub use viewer::{SnapshotViewer, Viewer};
