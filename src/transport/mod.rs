//! WebSocket transport layer.
//!
//! This module handles communication with the browser's remote end over a
//! single persistent duplex channel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session (Rust) │                              │  Browser        │
//! │                 │         WebSocket            │  (Remote End)   │
//! │  Connection     │◄────────────────────────────►│                 │
//! │  event loop     │        ws://host:port        │  BiDi endpoint  │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Dial the browser's WebSocket endpoint
//! 2. `Connection::send` - Send commands, receive correlated responses
//! 3. `Connection::shutdown` - Close the channel; pending commands fail
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Event loop, correlation, timeouts |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and command dispatch loop.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
