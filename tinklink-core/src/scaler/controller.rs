//! Scaler controller
//!
//! Turns switcher input changes into scaler commands and infers the
//! scaler's power state from its console output.
//!
//! The scaler never acknowledges a wake command directly. From `Unknown`
//! the controller sends `pwr on` and waits a short window: a "Powering Up"
//! line means it was off and is now booting, silence means it was already
//! on. Commands issued while a wake sequence is outstanding are held in a
//! single pending slot (newest wins) and flushed once the scaler is ready,
//! or when the wait times out.
//!
//! Everything is driven from the main loop with explicit millisecond
//! timestamps; nothing here blocks.

use heapless::String;
use tinklink_protocol::{sanitize_line, Command, Frame, PeerEvent, MAX_COMMAND_LEN};

use super::power::{PowerPolicy, PowerState};
use super::trigger::{TableFull, TriggerMapping, TriggerMode, TriggerTable};
use crate::log::Log;
use crate::traits::SerialLink;
use crate::{log_debug, log_info, log_warn};

/// Time to wait for "Powering Up" after a wake from `Unknown`
pub const WAKE_WINDOW_MS: u32 = 3_000;

/// Time allowed for the scaler to finish booting
pub const BOOT_WINDOW_MS: u32 = 15_000;

/// Delay before the one-shot keep-alive after an indexed switch
pub const KEEP_ALIVE_DELAY_MS: u32 = 1_000;

/// Armed keep-alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct KeepAlive {
    profile: u16,
    armed_ms: u32,
}

/// Profile chosen by a trigger, with the mode it is selected in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Selection {
    profile: u16,
    mode: TriggerMode,
}

impl Selection {
    fn command(&self) -> Command {
        self.mode.command(self.profile)
    }
}

/// Milliseconds from `since` to `now`, tolerant of counter wrap
fn elapsed(now_ms: u32, since_ms: u32) -> u32 {
    now_ms.wrapping_sub(since_ms)
}

/// Scaler controller
///
/// Owns exactly one transport and the trigger table.
pub struct ScalerController<T: SerialLink, L: Log> {
    link: T,
    log: L,
    policy: PowerPolicy,
    triggers: TriggerTable,
    state: PowerState,
    /// Queued selection; only present while `Waking` or `Booting`
    pending: Option<Selection>,
    /// Start of the current wake or boot wait
    wait_started_ms: u32,
    keep_alive: Option<KeepAlive>,
    /// Minimal policy: the single wake has gone out
    wake_sent: bool,
    last_command: String<MAX_COMMAND_LEN>,
}

impl<T: SerialLink, L: Log> ScalerController<T, L> {
    /// Create a controller with an empty trigger table
    pub fn new(link: T, policy: PowerPolicy, log: L) -> Self {
        log_info!(log, "scaler: power management {}", policy.as_str());
        Self {
            link,
            log,
            policy,
            triggers: TriggerTable::new(),
            state: PowerState::Unknown,
            pending: None,
            wait_started_ms: 0,
            keep_alive: None,
            wake_sent: false,
            last_command: String::new(),
        }
    }

    // ---- Triggers ----

    pub fn add_trigger(&mut self, mapping: TriggerMapping) -> Result<(), TableFull> {
        log_debug!(
            self.log,
            "scaler: trigger input {} -> profile {} ({:?})",
            mapping.input,
            mapping.profile,
            mapping.mode
        );
        self.triggers.push(mapping)
    }

    pub fn clear_triggers(&mut self) {
        self.triggers.clear();
        log_debug!(self.log, "scaler: triggers cleared");
    }

    /// Replace the trigger table wholesale
    pub fn set_triggers(&mut self, triggers: TriggerTable) {
        log_debug!(self.log, "scaler: {} triggers loaded", triggers.len());
        self.triggers = triggers;
    }

    pub fn triggers(&self) -> &TriggerTable {
        &self.triggers
    }

    // ---- Status ----

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn power_state(&self) -> PowerState {
        self.state
    }

    pub fn policy(&self) -> PowerPolicy {
        self.policy
    }

    /// Text of the last command attempted, sent or not
    pub fn last_command(&self) -> &str {
        &self.last_command
    }

    pub fn pending_command(&self) -> Option<Command> {
        self.pending.map(|selection| selection.command())
    }

    pub fn link(&self) -> &T {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }

    // ---- Events ----

    /// Handle a switcher input change
    pub fn on_input_change(&mut self, input: u16, now_ms: u32) {
        let Some(mapping) = self.triggers.find(input) else {
            log_debug!(self.log, "scaler: no trigger for input {}", input);
            return;
        };
        let selection = Selection {
            profile: mapping.profile,
            mode: mapping.mode,
        };
        log_info!(
            self.log,
            "scaler: input {} triggered '{}'",
            input,
            selection.command()
        );

        match self.policy {
            PowerPolicy::Disabled => {
                self.send_profile(selection, now_ms);
            }
            PowerPolicy::Minimal => {
                if !self.wake_sent {
                    self.wake_sent = true;
                    self.begin_wake(PowerState::Booting, selection, now_ms);
                } else if self.state.is_waiting() {
                    self.replace_pending(selection);
                } else {
                    self.send_profile(selection, now_ms);
                }
            }
            PowerPolicy::Tracked => match self.state {
                PowerState::Sleeping => self.begin_wake(PowerState::Booting, selection, now_ms),
                PowerState::Unknown => self.begin_wake(PowerState::Waking, selection, now_ms),
                PowerState::On => {
                    self.send_profile(selection, now_ms);
                }
                PowerState::Waking | PowerState::Booting => self.replace_pending(selection),
            },
        }
    }

    /// Send arbitrary command text, bypassing the trigger table
    pub fn send_raw_command(&mut self, text: &str) -> bool {
        log_debug!(self.log, "scaler: raw command '{}'", text);
        self.transmit(text)
    }

    /// Poll the link, process scaler output and run timers
    pub fn update(&mut self, now_ms: u32) {
        self.link.update();

        while let Some(raw) = self.link.read_line() {
            let line = sanitize_line(&raw);
            self.handle_line(&line, now_ms);
        }

        self.check_timeouts(now_ms);
        self.check_keep_alive(now_ms);
    }

    // ---- Internals ----

    fn handle_line(&mut self, line: &str, now_ms: u32) {
        log_debug!(self.log, "scaler rx: {}", line);

        match PeerEvent::classify(line) {
            PeerEvent::PoweringUp => {
                if self.state == PowerState::Waking {
                    log_info!(self.log, "scaler: wake confirmed, booting");
                } else {
                    log_info!(self.log, "scaler: powering up");
                    self.wait_started_ms = now_ms;
                }
                self.state = PowerState::Booting;
            }
            PeerEvent::BootComplete => {
                log_info!(self.log, "scaler: boot complete");
                self.state = PowerState::On;
                self.flush_pending(now_ms);
            }
            PeerEvent::PoweredOff => {
                log_info!(self.log, "scaler: powered off");
                if let Some(dropped) = self.pending.take() {
                    log_warn!(self.log, "scaler: dropped pending '{}'", dropped.command());
                }
                self.keep_alive = None;
                self.state = PowerState::Sleeping;
            }
            PeerEvent::Other => {}
        }
    }

    fn check_timeouts(&mut self, now_ms: u32) {
        let waited = elapsed(now_ms, self.wait_started_ms);
        match self.state {
            PowerState::Waking if waited >= WAKE_WINDOW_MS => {
                log_info!(self.log, "scaler: no wake response, assuming on");
                self.state = PowerState::On;
                self.flush_pending(now_ms);
            }
            PowerState::Booting if waited >= BOOT_WINDOW_MS => {
                let next = self.policy.boot_timeout_state();
                log_warn!(
                    self.log,
                    "scaler: boot not confirmed after {} ms, assuming {}",
                    waited,
                    next.as_str()
                );
                self.state = next;
                self.flush_pending(now_ms);
            }
            _ => {}
        }
    }

    fn check_keep_alive(&mut self, now_ms: u32) {
        let Some(keep_alive) = self.keep_alive else {
            return;
        };
        if elapsed(now_ms, keep_alive.armed_ms) >= KEEP_ALIVE_DELAY_MS {
            self.keep_alive = None;
            self.send_command(Command::SvsCurrentInput(keep_alive.profile));
        }
    }

    /// Send the wake command and hold `selection` until the scaler is ready
    ///
    /// The keep-alive of an earlier profile is cancelled; the flush arms
    /// one for the held selection.
    fn begin_wake(&mut self, next: PowerState, selection: Selection, now_ms: u32) {
        self.keep_alive = None;
        self.send_command(Command::PowerOn);
        self.state = next;
        self.wait_started_ms = now_ms;
        self.pending = Some(selection);
        log_info!(
            self.log,
            "scaler: {}, holding '{}'",
            next.as_str(),
            selection.command()
        );
    }

    fn replace_pending(&mut self, selection: Selection) {
        self.keep_alive = None;
        let command = selection.command();
        if let Some(old) = self.pending.replace(selection) {
            log_info!(
                self.log,
                "scaler: '{}' replaces pending '{}'",
                command,
                old.command()
            );
        } else {
            log_info!(self.log, "scaler: holding '{}'", command);
        }
    }

    fn flush_pending(&mut self, now_ms: u32) {
        if let Some(selection) = self.pending.take() {
            log_info!(self.log, "scaler: sending held '{}'", selection.command());
            self.send_profile(selection, now_ms);
        }
    }

    /// Send a trigger's command and arm or disarm the keep-alive
    fn send_profile(&mut self, selection: Selection, now_ms: u32) -> bool {
        let sent = self.send_command(selection.command());
        if sent {
            self.keep_alive = selection.mode.keeps_alive().then_some(KeepAlive {
                profile: selection.profile,
                armed_ms: now_ms,
            });
        }
        sent
    }

    fn send_command(&mut self, command: Command) -> bool {
        match command.text() {
            Ok(text) => self.transmit(&text),
            Err(e) => {
                log_warn!(self.log, "scaler: cannot render '{}': {:?}", command, e);
                false
            }
        }
    }

    fn transmit(&mut self, text: &str) -> bool {
        self.last_command.clear();
        for ch in text.chars() {
            if self.last_command.push(ch).is_err() {
                break;
            }
        }

        let frame = match Frame::new(text) {
            Ok(frame) => frame,
            Err(e) => {
                log_warn!(self.log, "scaler: rejected '{}': {:?}", text, e);
                return false;
            }
        };

        if self.link.send(frame.as_bytes()) {
            log_debug!(self.log, "scaler tx: {}", text);
            true
        } else if self.link.is_connected() {
            log_warn!(self.log, "scaler: send failed, dropped '{}'", text);
            false
        } else {
            log_warn!(self.log, "scaler: not connected, dropped '{}'", text);
            false
        }
    }
}
