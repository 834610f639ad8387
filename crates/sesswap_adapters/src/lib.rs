pub mod accounts;
pub mod cdp;
pub mod configuration;
pub mod network;
pub mod telemetry;

// Re-exports for convenience
pub use accounts::FileAccountStore;
pub use cdp::CdpSessionBridge;
