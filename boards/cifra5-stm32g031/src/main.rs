#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod display;
mod flaps;
mod rtc;
mod storage;

stm32_tim2_monotonic!(Mono, 1_000_000);

fn now_ms() -> u64 {
    Mono::now().duration_since_epoch().to_millis()
}

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1, USART2])]
mod app {
    use super::*;
    use cifra_core::button::{Debouncer, PressDetector};
    use cifra_core::events::{
        command_receiver, command_sender, display_receiver, display_sender,
    };
    use cifra_core::ui::UiContext;
    use cifra_core::{
        Button, CalibrationStore, ClockConfig, ClockController, Devices, DisplayEvent, EventSink,
        MechStore, SettingsFlash, SilentHoursStore, Stores, UiConfig, UiController, UiOutcome,
    };
    use defmt::{info, warn};
    use embassy_stm32::flash::Flash;
    use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
    use embassy_stm32::rcc::{LsConfig, LseConfig, LseDrive, LseMode, RtcClockSource};
    use embassy_stm32::rtc::{Rtc, RtcConfig};
    use embassy_stm32::time::Hertz;
    use embassy_stm32::timer::low_level::CountingMode;
    use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};

    use crate::flaps::{FlapDrive, Reeds};
    use crate::rtc::BoardRtc;
    use crate::storage::SettingsPage;

    /// Flap drum with 24 hour flaps
    static MECH: MechStore = MechStore::new(cifra_core::Dial::H24);
    static CALIBRATION: CalibrationStore = CalibrationStore::new();
    static SILENT: SilentHoursStore = SilentHoursStore::new();

    fn stores() -> Stores<'static> {
        Stores {
            mech: &MECH,
            calibration: &CALIBRATION,
            silent: &SILENT,
        }
    }

    /// Raw samples a level must hold before it counts
    const DEBOUNCE_SAMPLES: u8 = 4;
    const BUTTON_SCAN_MS: u64 = 5;

    type Clock = ClockController<'static, BoardRtc, FlapDrive, Reeds, SettingsPage>;

    pub struct Buttons {
        set: Input<'static>,
        inc: Input<'static>,
        dec: Input<'static>,
    }

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        clock: Clock,
        buttons: Buttons,
    }

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Cifra 5 controller starting...");

        // HSI16 as SYSCLK, 32.768 kHz LSE on PC14/PC15 for the RTC
        let mut config = embassy_stm32::Config::default();
        config.rcc.ls = LsConfig {
            rtc: RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz(32_768),
                mode: LseMode::Oscillator(LseDrive::MediumHigh),
            }),
        };

        let p = embassy_stm32::init(config);

        // TIM2 on APB1 with no prescaler runs at SYSCLK
        Mono::start(16_000_000);
        info!("TIM2 monotonic timer initialized at 1 MHz");

        let rtc = Rtc::new(p.RTC, RtcConfig::default());
        info!("Internal RTC initialized with LSE (32.768kHz)");

        let coil_a = Output::new(p.PA0, Level::Low, Speed::Low);
        let coil_b = Output::new(p.PA1, Level::Low, Speed::Low);
        let servo = SimplePwm::new(
            p.TIM1,
            Some(PwmPin::new(p.PA8, OutputType::PushPull)),
            None,
            None,
            None,
            Hertz(50),
            CountingMode::EdgeAlignedUp,
        );
        let reeds = Reeds::new(Input::new(p.PB0, Pull::Up), Input::new(p.PB1, Pull::Up));

        let devices = Devices {
            rtc: BoardRtc::new(rtc),
            actuator: FlapDrive::new(coil_a, coil_b, servo),
            sensors: reeds,
        };
        let settings = SettingsFlash::new(SettingsPage::new(Flash::new_blocking(p.FLASH)));
        let clock = ClockController::new(ClockConfig::default(), devices, settings, stores());

        let buttons = Buttons {
            set: Input::new(p.PB4, Pull::Up),
            inc: Input::new(p.PB5, Pull::Up),
            dec: Input::new(p.PB6, Pull::Up),
        };

        clock_task::spawn().ok();
        button_task::spawn().ok();
        display_task::spawn().ok();

        (Shared {}, Local { clock, buttons })
    }

    /// Clock task - keeps the flaps in step with the RTC
    ///
    /// Wakes once a second, or early when the display task sends a command.
    #[task(priority = 1, local = [clock])]
    async fn clock_task(cx: clock_task::Context) {
        let clock = cx.local.clock;
        let mut events = display_sender();
        let commands = command_receiver();

        clock.boot(&mut events);
        info!(
            "Clock booted in {}, sync pending: {}",
            clock.phase(),
            clock.sync_pending()
        );

        loop {
            match Mono::timeout_after(1000.millis(), commands.receive()).await {
                Ok(command) => {
                    if let Err(e) = clock.handle_command(command, &mut events) {
                        warn!("Command {} failed: {}", command, e);
                    }
                }
                Err(_) => {
                    if let Err(e) = clock.on_tick(&mut events) {
                        warn!("Tick failed: {}", e);
                    }
                }
            }
        }
    }

    /// Button task - debounces the three buttons and classifies presses
    #[task(priority = 2, local = [buttons])]
    async fn button_task(cx: button_task::Context) {
        let buttons = cx.local.buttons;
        let mut events = display_sender();
        let mut debouncers = [Debouncer::new(DEBOUNCE_SAMPLES); 3];
        let mut presses = PressDetector::new(UiConfig::default().long_press_ms);

        info!("Button task started");
        loop {
            let now = now_ms();
            let samples = [
                (Button::Set, buttons.set.is_low()),
                (Button::Inc, buttons.inc.is_low()),
                (Button::Dec, buttons.dec.is_low()),
            ];
            for (debouncer, (button, sample)) in debouncers.iter_mut().zip(samples) {
                if let Some(pressed) = debouncer.update(sample) {
                    if let Some(event) = presses.on_edge(button, pressed, now) {
                        events.emit(DisplayEvent::Button(event));
                    }
                }
            }
            if let Some(event) = presses.poll(now) {
                events.emit(DisplayEvent::Button(event));
            }
            Mono::delay(BUTTON_SCAN_MS.millis()).await;
        }
    }

    /// Display task - runs the UI state machine and forwards commands
    #[task(priority = 2)]
    async fn display_task(_cx: display_task::Context) {
        let stores = stores();
        let events = display_receiver();
        let commands = command_sender();
        let mut ui = UiController::new(UiConfig::default());
        crate::display::render(&ui);

        loop {
            let received = Mono::timeout_after(100.millis(), events.receive()).await;
            let now = now_ms();
            let changed = match received {
                Ok(event) => match ui.handle(event, &UiContext::from_stores(&stores), now) {
                    UiOutcome::Ignored => false,
                    UiOutcome::Updated => true,
                    UiOutcome::Command(command) => {
                        commands.send(command).await;
                        true
                    }
                },
                Err(_) => ui.poll(now),
            };
            if changed {
                crate::display::render(&ui);
            }
        }
    }

    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }
}
