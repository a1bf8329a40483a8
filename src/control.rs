//! # Control Loop
//!
//! Ties the joystick, the mixer and the motor dispatcher together.
//!
//! ## Lifecycle
//!
//! ```text
//! Init -> Calibrating -> Running -> Stopping -> Terminated
//!              |              |          ^
//!              +--------------+----------+  (shutdown or error)
//! ```
//!
//! `Stopping` is reached on every way out of the loop. It always publishes
//! `stop`, even when the cache says the wheels are already stopped, so the
//! motor subsystem never keeps driving after this process has given up.
//!
//! A panic inside the loop is caught and reported as
//! [`JoystickError::Panicked`], after the stop has been sent.

use std::any::Any;
use std::future::{poll_fn, Future};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::task::Poll;

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::adc::AdcReader;
use crate::bus::MessagePublisher;
use crate::config::Config;
use crate::drive::{mix, MotorCommandDispatcher, MotorState, WheelPosition};
use crate::error::{JoystickError, Result};
use crate::joystick::calibration::AxisCalibrator;
use crate::joystick::Joystick;

/// Default control period (10Hz)
pub const DEFAULT_PERIOD_MS: u64 = 100;

/// Number of cycles between status log messages (one minute at 10Hz)
const LOG_INTERVAL_CYCLES: u64 = 600;

/// Where the control loop is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Init,
    Calibrating,
    Running,
    Stopping,
    Terminated,
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopPhase::Init => "init",
            LoopPhase::Calibrating => "calibrating",
            LoopPhase::Running => "running",
            LoopPhase::Stopping => "stopping",
            LoopPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Periodic joystick-to-motor control loop
pub struct ControlLoop<A, P> {
    joystick: Joystick<A>,
    dispatcher: MotorCommandDispatcher<P>,
    calibrator: AxisCalibrator,
    period: Duration,
    phase: LoopPhase,
    cycles: u64,
}

impl<A, P> std::fmt::Debug for ControlLoop<A, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("joystick", &self.joystick)
            .field("dispatcher", &self.dispatcher)
            .field("period", &self.period)
            .field("phase", &self.phase)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl<A: AdcReader, P: MessagePublisher> ControlLoop<A, P> {
    pub fn new(
        joystick: Joystick<A>,
        dispatcher: MotorCommandDispatcher<P>,
        calibrator: AxisCalibrator,
        period: Duration,
    ) -> Self {
        Self {
            joystick,
            dispatcher,
            calibrator,
            period,
            phase: LoopPhase::Init,
            cycles: 0,
        }
    }

    /// Builds the loop from a validated configuration.
    pub fn from_config(adc: A, publisher: P, config: &Config) -> Self {
        let axis = config.calibration.initial_axis();
        let joystick = Joystick::with_axes(adc, config.adc.gain, axis, axis)
            .with_channels(config.adc.x_channel, config.adc.y_channel);
        let dispatcher = MotorCommandDispatcher::new(publisher, config.bus.topic.clone());

        Self::new(
            joystick,
            dispatcher,
            config.calibration.calibrator(),
            config.control.period(),
        )
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn joystick(&self) -> &Joystick<A> {
        &self.joystick
    }

    pub fn dispatcher(&self) -> &MotorCommandDispatcher<P> {
        &self.dispatcher
    }

    /// Completed `step` calls
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn transition(&mut self, next: LoopPhase) {
        info!("Control loop: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Runs one control cycle: read, mix, dispatch.
    ///
    /// A centered stick sends at most one `stop`. Otherwise each wheel gets
    /// its side's speed, deduplicated by the dispatcher.
    pub async fn step(&mut self) -> Result<()> {
        let position = self.joystick.get_position().await?;
        let (left, right) = mix(position.x, position.y);
        debug!("Position ({}, {}) -> speeds ({}, {})", position.x, position.y, left, right);

        if left == 0.0 && right == 0.0 {
            self.dispatcher.stop_all().await?;
        } else {
            for wheel in WheelPosition::ALL {
                let state = MotorState::from_signed(if wheel.is_left() { left } else { right });
                self.dispatcher.drive(wheel, state.speed, state.direction).await?;
            }
        }

        self.cycles += 1;
        if self.cycles % LOG_INTERVAL_CYCLES == 0 {
            info!("Completed {} control cycles", self.cycles);
        }
        Ok(())
    }

    async fn calibrate_and_run(&mut self) -> Result<()> {
        self.transition(LoopPhase::Calibrating);
        self.joystick.calibrate(&self.calibrator).await?;

        self.transition(LoopPhase::Running);
        info!("Driving motors every {:?}", self.period);

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.step().await?;
        }
    }

    /// Calibrates, then runs until `shutdown` resolves or a cycle fails.
    ///
    /// Whatever ends the run, a `stop` is published before returning.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the loop. If the loop ended cleanly but the
    /// final `stop` could not be published, returns that error instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use robot_joystick::adc::SimulatedAdc;
    /// use robot_joystick::bus::RedisPublisher;
    /// use robot_joystick::config::Config;
    /// use robot_joystick::control::ControlLoop;
    ///
    /// # async fn run() -> anyhow::Result<()> {
    /// let config = Config::default();
    /// let bus = RedisPublisher::connect(&config.bus.host, config.bus.port, config.bus.db).await?;
    /// let mut control = ControlLoop::from_config(SimulatedAdc::new(), bus, &config);
    ///
    /// control.run_until(tokio::signal::ctrl_c()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_until<F: Future>(&mut self, shutdown: F) -> Result<()> {
        let outcome = {
            let mut running = Box::pin(self.calibrate_and_run());
            let guarded = poll_fn(|cx| {
                match catch_unwind(AssertUnwindSafe(|| running.as_mut().poll(cx))) {
                    Ok(poll) => poll,
                    Err(payload) => Poll::Ready(Err(JoystickError::Panicked(panic_message(&*payload)))),
                }
            });

            tokio::select! {
                result = guarded => result,
                _ = shutdown => {
                    info!("Shutdown requested");
                    Ok(())
                }
            }
        };

        if let Err(e) = &outcome {
            error!("Control loop failed: {}", e);
        }

        self.transition(LoopPhase::Stopping);
        let stopped = self.dispatcher.force_stop().await;
        if let Err(e) = &stopped {
            warn!("Failed to publish final stop: {}", e);
        }

        self.transition(LoopPhase::Terminated);
        info!("Total control cycles: {}", self.cycles);

        outcome.and(stopped)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
