mod account;
mod auth;
mod enums;
mod market;
mod primitives;
mod trade;
mod websocket;

// Re-export all types
pub use account::*;
pub use auth::*;
pub use enums::*;
pub use market::*;
pub use primitives::*;
pub use trade::*;
pub use websocket::*;
