//! # Motor Command Dispatcher
//!
//! Publishes motor commands only when the commanded state changes.
//!
//! The motor subsystem holds the last command it received indefinitely, so
//! repeating an identical command is wasted traffic. The dispatcher keeps the
//! last state sent for every wheel and suppresses duplicates:
//!
//! - [`drive`](MotorCommandDispatcher::drive) publishes one `drive_motor`
//!   message when a wheel's state changes.
//! - [`stop_all`](MotorCommandDispatcher::stop_all) publishes a single `stop`
//!   when any wheel is still moving.
//! - [`force_stop`](MotorCommandDispatcher::force_stop) always publishes
//!   `stop`, whatever the cache says.
//!
//! ## Usage
//!
//! ```no_run
//! use robot_joystick::bus::RedisPublisher;
//! use robot_joystick::drive::command::{Direction, WheelPosition};
//! use robot_joystick::drive::dispatcher::MotorCommandDispatcher;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let bus = RedisPublisher::connect("127.0.0.1", 6379, 0).await?;
//! let mut dispatcher = MotorCommandDispatcher::new(bus, "subsystem.motor.command");
//!
//! dispatcher.drive(WheelPosition::FrontLeft, 0.5, Direction::Forward).await?;
//! dispatcher.drive(WheelPosition::FrontLeft, 0.5, Direction::Forward).await?; // suppressed
//! dispatcher.stop_all().await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::command::{Direction, DriveCommand, MotorState, WheelPosition};
use crate::bus::MessagePublisher;
use crate::error::Result;

/// Last commanded state of every wheel
#[derive(Debug, Clone, PartialEq)]
pub struct MotorStates {
    states: BTreeMap<WheelPosition, MotorState>,
}

impl Default for MotorStates {
    fn default() -> Self {
        Self {
            states: WheelPosition::ALL
                .iter()
                .map(|&p| (p, MotorState::default()))
                .collect(),
        }
    }
}

impl MotorStates {
    #[must_use]
    pub fn get(&self, position: WheelPosition) -> MotorState {
        self.states.get(&position).copied().unwrap_or_default()
    }

    fn set(&mut self, position: WheelPosition, state: MotorState) {
        self.states.insert(position, state);
    }

    /// True if any wheel was last commanded to a nonzero speed
    #[must_use]
    pub fn any_moving(&self) -> bool {
        self.states.values().any(|s| s.speed > 0.0)
    }

    /// Zeroes every speed, keeping the last direction.
    fn zero_speeds(&mut self) {
        for state in self.states.values_mut() {
            state.speed = 0.0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WheelPosition, MotorState)> + '_ {
        self.states.iter().map(|(&p, &s)| (p, s))
    }
}

/// Deduplicating publisher of motor commands
pub struct MotorCommandDispatcher<P> {
    publisher: P,
    topic: String,
    states: MotorStates,
}

impl<P> std::fmt::Debug for MotorCommandDispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotorCommandDispatcher")
            .field("topic", &self.topic)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

impl<P: MessagePublisher> MotorCommandDispatcher<P> {
    /// Creates a dispatcher with every wheel stopped and facing forward.
    pub fn new(publisher: P, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
            states: MotorStates::default(),
        }
    }

    /// Cached state of every wheel
    pub fn states(&self) -> &MotorStates {
        &self.states
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Commands one wheel, unless it is already in that state.
    ///
    /// The cache is updated only after the publish succeeds.
    pub async fn drive(
        &mut self,
        position: WheelPosition,
        speed: f64,
        direction: Direction,
    ) -> Result<()> {
        let new_state = MotorState::new(speed, direction);
        if new_state == self.states.get(position) {
            return Ok(());
        }

        self.send(&DriveCommand::DriveMotor {
            position,
            speed,
            direction,
        })
        .await?;
        self.states.set(position, new_state);
        Ok(())
    }

    /// Stops every wheel with a single message, if any wheel is moving.
    ///
    /// Like [`drive`](Self::drive), the cache only changes once the publish
    /// succeeds.
    pub async fn stop_all(&mut self) -> Result<()> {
        if !self.states.any_moving() {
            return Ok(());
        }

        self.send(&DriveCommand::Stop).await?;
        self.states.zero_speeds();
        Ok(())
    }

    /// Publishes `stop` regardless of the cached state.
    pub async fn force_stop(&mut self) -> Result<()> {
        self.send(&DriveCommand::Stop).await?;
        self.states.zero_speeds();
        Ok(())
    }

    async fn send(&mut self, command: &DriveCommand) -> Result<()> {
        let payload = command.to_payload()?;
        debug!("Publishing {:?}", command);
        self.publisher.publish(&self.topic, &payload).await
    }
}
