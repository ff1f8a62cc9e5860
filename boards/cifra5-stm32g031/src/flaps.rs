//! Flap mechanism drivers
//!
//! Minutes: a bistable coil driven through an H-bridge, one pulse per
//! minute with alternating polarity. Hours: a hobby servo that pushes the
//! hour drum one flap per swing; it is only powered while engaged.
//! Position: two reed switches. The hour reed pin goes high as the
//! minute drum reaches :00; the day reed pin goes low as the hour drum
//! reaches 00.

use core::convert::Infallible;

use cifra_hal::{Actuator, Coil, MarkLevel, PositionSensors};
use embassy_stm32::gpio::{Input, Output};
use embassy_stm32::peripherals::TIM1;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_time::{block_for, Duration};

/// Coil energize time per minute step
const COIL_PULSE: Duration = Duration::from_millis(80);
/// Settle time before the next pulse
const COIL_REST: Duration = Duration::from_millis(40);
/// Servo travel time for one half swing
const SERVO_TRAVEL: Duration = Duration::from_millis(250);

/// Servo pulse widths as a fraction of the 20 ms PWM period
const SERVO_PARK: (u16, u16) = (1, 20); // 1.0 ms
const SERVO_PUSH: (u16, u16) = (2, 20); // 2.0 ms

pub struct FlapDrive {
    coil_a: Output<'static>,
    coil_b: Output<'static>,
    servo: SimplePwm<'static, TIM1>,
}

impl FlapDrive {
    pub fn new(coil_a: Output<'static>, coil_b: Output<'static>, servo: SimplePwm<'static, TIM1>) -> Self {
        let mut drive = Self {
            coil_a,
            coil_b,
            servo,
        };
        drive.coil_a.set_low();
        drive.coil_b.set_low();
        drive.servo.ch1().disable();
        drive
    }

    fn servo_to(&mut self, (num, denom): (u16, u16)) {
        self.servo.ch1().set_duty_cycle_fraction(num, denom);
        block_for(SERVO_TRAVEL);
    }
}

impl Actuator for FlapDrive {
    type Error = Infallible;

    fn step_minute(&mut self, coil: Coil) -> Result<(), Infallible> {
        let pin = match coil {
            Coil::Tick => &mut self.coil_a,
            Coil::Tock => &mut self.coil_b,
        };
        pin.set_high();
        block_for(COIL_PULSE);
        pin.set_low();
        block_for(COIL_REST);
        Ok(())
    }

    fn step_hour(&mut self) -> Result<(), Infallible> {
        self.servo_to(SERVO_PUSH);
        self.servo_to(SERVO_PARK);
        Ok(())
    }

    fn engage_hours(&mut self) -> Result<(), Infallible> {
        self.servo.ch1().set_duty_cycle_fraction(SERVO_PARK.0, SERVO_PARK.1);
        self.servo.ch1().enable();
        block_for(SERVO_TRAVEL);
        Ok(())
    }

    fn release_hours(&mut self) -> Result<(), Infallible> {
        self.servo.ch1().disable();
        Ok(())
    }
}

/// Hour reed level at :00
const HOUR_MARK: MarkLevel = MarkLevel::High;
/// Day reed level at 00
const DAY_MARK: MarkLevel = MarkLevel::Low;

/// Reed switches on the flap drums
pub struct Reeds {
    hour: Input<'static>,
    day: Input<'static>,
}

impl Reeds {
    pub fn new(hour: Input<'static>, day: Input<'static>) -> Self {
        Self { hour, day }
    }
}

impl PositionSensors for Reeds {
    type Error = Infallible;

    fn hour_mark(&mut self) -> Result<bool, Infallible> {
        Ok(HOUR_MARK.is_mark(self.hour.is_high()))
    }

    fn day_mark(&mut self) -> Result<bool, Infallible> {
        Ok(DAY_MARK.is_mark(self.day.is_high()))
    }
}
