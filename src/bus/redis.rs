//! # Redis Publisher
//!
//! Sends `PUBLISH` commands to a Redis server through the `redis` client.
//!
//! The connection is opened once at startup and owned by the control loop.
//! Every publish waits for the server's reply so errors surface on the call
//! that caused them; nothing is retried.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::{debug, info};

use super::MessagePublisher;
use crate::error::{JoystickError, Result};

/// Default Redis port
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Redis pub/sub publisher
pub struct RedisPublisher {
    connection: MultiplexedConnection,
    address: String,
}

impl std::fmt::Debug for RedisPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPublisher")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Connection parameters for `host:port`, database `db`
#[must_use]
pub fn connection_info(host: &str, port: u16, db: u32) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(host.to_string(), port),
        redis: RedisConnectionInfo {
            db: i64::from(db),
            ..RedisConnectionInfo::default()
        },
    }
}

impl RedisPublisher {
    /// Connect to `host:port` and select `db`
    ///
    /// # Errors
    ///
    /// Returns [`JoystickError::Transport`] if the connection fails or the
    /// server rejects the database selection.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use robot_joystick::bus::{MessagePublisher, RedisPublisher};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut bus = RedisPublisher::connect("127.0.0.1", 6379, 0).await?;
    ///     bus.publish("subsystem.motor.command", br#"{"command":"stop"}"#).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(host: &str, port: u16, db: u32) -> Result<Self> {
        let address = format!("{}:{}", host, port);
        debug!("Connecting to Redis at {} (db {})", address, db);

        let client = redis::Client::open(connection_info(host, port, db)).map_err(|e| {
            JoystickError::Transport(format!("Invalid Redis address {}: {}", address, e))
        })?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| JoystickError::Transport(format!("Failed to connect to {}: {}", address, e)))?;

        info!("Connected to Redis at {}", address);
        Ok(Self {
            connection,
            address,
        })
    }

    /// Address of the connected server
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl MessagePublisher for RedisPublisher {
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        let receivers: i64 = self
            .connection
            .publish(topic, payload)
            .await
            .map_err(|e| JoystickError::Transport(format!("PUBLISH to {} failed: {}", topic, e)))?;

        debug!("Published {} bytes to {} ({} receivers)", payload.len(), topic, receivers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_info_default_db() {
        let info = connection_info("127.0.0.1", DEFAULT_REDIS_PORT, 0);
        assert_eq!(info.addr, ConnectionAddr::Tcp("127.0.0.1".to_string(), 6379));
        assert_eq!(info.redis.db, 0);
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn test_connection_info_selects_database() {
        let info = connection_info("redis.local", 6380, 3);
        assert_eq!(info.addr, ConnectionAddr::Tcp("redis.local".to_string(), 6380));
        assert_eq!(info.redis.db, 3);
    }

    #[tokio::test]
    async fn test_connect_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = RedisPublisher::connect("127.0.0.1", port, 0).await;
        match result {
            Err(JoystickError::Transport(msg)) => {
                assert!(msg.contains(&format!("127.0.0.1:{}", port)), "{}", msg)
            }
            other => panic!("Expected transport error, got {:?}", other),
        }
    }
}
