//! Long-running tasks driving a shared BC80 instance.
//!
//! These are plain async loops so the board crate can wrap them in
//! `#[embassy_executor::task]` functions with concrete types.

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker, Timer};
use embedded_hal_async::digital::Wait;

use super::device::Bc80;
use crate::config;
use crate::fmt::Dbg;
use crate::regmap::RegisterMap;
use crate::shared_state::{
    Bc80Command, Bc80Readings, BC80_CHANNEL, BC80_COMMAND_CHANNEL, CABLE_CHANNEL,
};

/// Apply one queued command to the device.
pub async fn dispatch_command<R: RegisterMap>(dev: &mut Bc80<R>, command: Bc80Command) {
    match command {
        Bc80Command::SetMode(mode) => {
            if let Err(e) = dev.change_mode(mode).await {
                warn!("BC80: SetMode rejected: {:?}", e);
            }
        }
        Bc80Command::SetInfet(enable) => dev.set_infet(enable).await,
        Bc80Command::SetReversePower(enable) => dev.set_reverse_power(enable),
        Bc80Command::Dump => {
            if let Err(e) = dev.dump_registers().await {
                warn!("BC80: dump failed: {:?}", e);
            }
        }
    }
}

/// Policy and monitor loop.
///
/// Feeds cable events and commands to the device as they arrive and
/// publishes a readings snapshot every `BC80_LOG_PERIOD_MS`.
pub async fn bc80_task<M, R>(bc80: &Mutex<M, Bc80<R>>)
where
    M: RawMutex,
    R: RegisterMap,
{
    let mut cable_sub = match CABLE_CHANNEL.subscriber() {
        Ok(s) => s,
        Err(_) => {
            error!("BC80: no cable subscriber slot left");
            return;
        }
    };
    let mut command_sub = match BC80_COMMAND_CHANNEL.subscriber() {
        Ok(s) => s,
        Err(_) => {
            error!("BC80: no command subscriber slot left");
            return;
        }
    };
    let publisher = BC80_CHANNEL.immediate_publisher();
    let mut ticker = Ticker::every(Duration::from_millis(config::BC80_LOG_PERIOD_MS));

    loop {
        match select3(
            cable_sub.next_message_pure(),
            command_sub.next_message_pure(),
            ticker.next(),
        )
        .await
        {
            Either3::First(cable) => {
                let mut dev = bc80.lock().await;
                dev.on_cable_changed(cable).await;
            }
            Either3::Second(command) => {
                let mut dev = bc80.lock().await;
                dispatch_command(&mut dev, command).await;
            }
            Either3::Third(()) => {
                let mut dev = bc80.lock().await;
                let adc = match dev.read_adc().await {
                    Ok(a) => a,
                    Err(e) => {
                        warn!("BC80: ADC read failed: {:?}", e);
                        continue;
                    }
                };
                let readings = Bc80Readings {
                    mode: dev.op_mode(),
                    cable: dev.cable_type(),
                    reverse_power: dev.reverse_power(),
                    infet_enabled: dev.infet_enabled(),
                    adc,
                };
                info!(
                    "BC80: mode={:?} cable={:?} VIN={}mV VOUT={}mV IIN={}mA TDIE={}C",
                    readings.mode,
                    readings.cable,
                    adc.vin_mv,
                    adc.vout_mv,
                    adc.iin_ma,
                    adc.tdie_c
                );
                publisher.publish_immediate(readings);
            }
        }
    }
}

/// Interrupt service loop for the BC80 INT line (open-drain, active-low).
pub async fn bc80_int_task<M, P, R>(mut int_pin: P, bc80: &Mutex<M, Bc80<R>>) -> !
where
    M: RawMutex,
    P: Wait,
    R: RegisterMap,
{
    loop {
        if let Err(e) = int_pin.wait_for_falling_edge().await {
            warn!("BC80: INT wait failed: {:?}", Dbg(&e));
            Timer::after_millis(10).await;
            continue;
        }
        let mut dev = bc80.lock().await;
        // Failures are already logged inside; interrupts are unmasked either way.
        let _ = dev.handle_irq().await;
    }
}
