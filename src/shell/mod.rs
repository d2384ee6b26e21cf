use core::fmt::Write;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use heapless::String;

use crate::bc80::regs::{DUMP_FIRST, DUMP_LEN};
use crate::bc80::{Bc80, CableType, OpMode};
use crate::regmap::RegisterMap;

const NG: &str = "NG\r\n";
const OK: &str = "OK\r\n";

/// Handle one line of factory-node input and write the reply into `out`.
///
/// Replies are ASCII: `OK`/`NG` for stores, the value for shows.
pub async fn handle_shell<M, R, const N: usize>(
    bc80: &Mutex<M, Bc80<R>>,
    line: &str,
    out: &mut String<N>,
) where
    M: RawMutex,
    R: RegisterMap,
{
    out.clear();
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let (cmd, args) = match line.split_once(char::is_whitespace) {
        Some((c, rest)) => (c, rest.trim_start()),
        None => (line, ""),
    };

    match cmd {
        "bc80" => handle_bc80(bc80, args, out).await,
        _ => {
            let _ = write!(out, "no shell command: {}\r\n", cmd);
        }
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s {
        "1" | "on" => Some(true),
        "0" | "off" => Some(false),
        _ => None,
    }
}

async fn handle_bc80<M, R, const N: usize>(bc80: &Mutex<M, Bc80<R>>, args: &str, out: &mut String<N>)
where
    M: RawMutex,
    R: RegisterMap,
{
    let mut it = args.split_whitespace();
    let sub = it.next();
    let value = it.next();

    match (sub, value) {
        (Some("mode"), None) => {
            let mut dev = bc80.lock().await;
            match dev.read_mode().await {
                Ok(m) => {
                    let _ = write!(out, "{}\r\n", m.name());
                }
                Err(_) => {
                    let _ = out.push_str(NG);
                }
            }
        }
        (Some("mode"), Some(v)) => {
            let reply = match OpMode::parse(v) {
                Some(mode) if mode.is_known() => {
                    let mut dev = bc80.lock().await;
                    if dev.change_mode(mode).await.is_ok() { OK } else { NG }
                }
                _ => NG,
            };
            let _ = out.push_str(reply);
        }
        (Some("cable"), None) => {
            let dev = bc80.lock().await;
            let _ = write!(out, "{}\r\n", dev.cable_type().name());
        }
        (Some("cable"), Some(v)) => {
            let reply = match CableType::parse(v) {
                Some(cable) => {
                    bc80.lock().await.on_cable_changed(cable).await;
                    OK
                }
                None => NG,
            };
            let _ = out.push_str(reply);
        }
        (Some("infet"), Some(v)) => {
            let reply = match parse_switch(v) {
                Some(en) => {
                    bc80.lock().await.set_infet(en).await;
                    OK
                }
                None => NG,
            };
            let _ = out.push_str(reply);
        }
        (Some("reverse"), Some(v)) => {
            let reply = match parse_switch(v) {
                Some(en) => {
                    bc80.lock().await.set_reverse_power(en);
                    OK
                }
                None => NG,
            };
            let _ = out.push_str(reply);
        }
        (Some("config"), None) => {
            let mut dev = bc80.lock().await;
            match dev.read_config().await {
                Ok(c) => {
                    let _ = write!(
                        out,
                        "mode={} infet={} prechg={} track={} fault=0x{:02X} fsw={}kHz\r\n",
                        c.mode.name(),
                        c.infet_enabled as u8,
                        c.precharge_enabled as u8,
                        c.track_enabled as u8,
                        c.fault_disable_mask,
                        c.fsw_khz
                    );
                }
                Err(_) => {
                    let _ = out.push_str(NG);
                }
            }
        }
        (Some("dump"), None) => {
            let mut dev = bc80.lock().await;
            match dev.dump_registers().await {
                Ok(d) => {
                    for row in (0..DUMP_LEN).step_by(8) {
                        let _ = write!(out, "{:02X}:", DUMP_FIRST as usize + row);
                        for reg in row..row + 8 {
                            match d.get(DUMP_FIRST + reg as u8) {
                                Some(b) => {
                                    let _ = write!(out, " {:02X}", b);
                                }
                                None => {
                                    let _ = out.push_str(" --");
                                }
                            }
                        }
                        let _ = out.push_str("\r\n");
                    }
                }
                Err(_) => {
                    let _ = out.push_str(NG);
                }
            }
        }
        (Some("help"), _) | (None, _) => {
            let _ = out.push_str(
                "bc80 commands:\r\n  mode [standby|bypass|switching|switching_alt|0-3]\r\n  cable [none|wired|wireless|pd_apdo]\r\n  infet <0|1>\r\n  reverse <0|1>\r\n  config\r\n  dump\r\n",
            );
        }
        _ => {
            let _ = out.push_str(NG);
        }
    }
}
