//
//  mod.rs
//  Flow
//

pub mod protocol;
pub mod routes;
pub mod server;

pub use protocol::Envelope;
pub use routes::{router, AppState};
pub use server::start_daemon;
