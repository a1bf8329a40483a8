//! # Message Bus Module
//!
//! Publishes motor commands to the motor-control subsystem.
//!
//! This module handles:
//! - The [`MessagePublisher`] capability used by the dispatcher
//! - A Redis pub/sub publisher built on the `redis` client

pub mod redis;

use async_trait::async_trait;

use crate::error::Result;

pub use self::redis::RedisPublisher;

/// Default topic the motor subsystem subscribes to
pub const MOTOR_COMMAND_TOPIC: &str = "subsystem.motor.command";

/// Fire-and-forget publisher
///
/// A failed publish is reported as
/// [`JoystickError::Transport`](crate::error::JoystickError::Transport) and is
/// never retried or buffered.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePublisher: Send {
    /// Publish `payload` on `topic`.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()>;
}
