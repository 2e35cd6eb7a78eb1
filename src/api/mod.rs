//! Azure Resource Manager API module
//!
//! A thin REST client over the control plane: client-credential login,
//! authenticated JSON requests with pagination, and blocking waits on
//! long-running operations. The resource, compute and network facades expose
//! only the calls the rotation workflow needs.

pub mod auth;
pub mod client;
pub mod compute;
pub mod constants;
pub mod error;
pub mod models;
pub mod network;
pub mod poller;
pub mod resources;
pub mod session;

pub use auth::TokenInfo;
pub use client::ArmClient;
pub use compute::ComputeClient;
pub use error::ArmError;
pub use network::NetworkClient;
pub use poller::LongRunningOperation;
pub use resources::ResourceClient;
pub use session::CloudSession;
