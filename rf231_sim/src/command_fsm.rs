//! Operating state machine of the transceiver.
//!
//! Transitions are computed here without touching the chip; [`crate::RadioChip`]
//! applies the framer actions and register updates.

use rf231_sim_lib::radio::{Command, OperatingState};

use crate::host::PowerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerAction {
    Keep,
    /// Start the framer if it is not running.
    Start,
    /// Stop the framer if it is running.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: OperatingState,
    pub transmitter: FramerAction,
    pub receiver: FramerAction,
    /// TRAC_STATUS is set to INVALID.
    pub trac_invalid: bool,
}

impl Transition {
    const fn to(next: OperatingState) -> Self {
        Self {
            next,
            transmitter: FramerAction::Keep,
            receiver: FramerAction::Keep,
            trac_invalid: false,
        }
    }

    const fn framers(mut self, transmitter: FramerAction, receiver: FramerAction) -> Self {
        self.transmitter = transmitter;
        self.receiver = receiver;
        self
    }

    const fn invalidate_trac(mut self) -> Self {
        self.trac_invalid = true;
        self
    }
}

/// Result of a command written to TRX_CMD. The current state never restricts a command.
pub fn on_command(state: OperatingState, command: Command) -> Transition {
    use FramerAction::{Start, Stop};

    match command {
        Command::Nop => Transition::to(state),
        Command::TxStart => Transition::to(OperatingState::BusyTx).framers(Start, Stop),
        Command::ForceTrxOff | Command::TrxOff => {
            Transition::to(OperatingState::TrxOff).framers(Stop, Stop)
        }
        Command::ForcePllOn | Command::TxOn => Transition::to(OperatingState::PllOn),
        Command::RxOn => Transition::to(OperatingState::RxOn).framers(Stop, Start),
        Command::RxAackOn => Transition::to(OperatingState::RxAackOn)
            .framers(Stop, Start)
            .invalidate_trac(),
        Command::TxAretOn => Transition::to(OperatingState::BusyTxAret)
            .framers(Start, Stop)
            .invalidate_trac(),
    }
}

/// State change on an SLP_TR edge, with the power mode to report if any.
pub fn on_sleep_pin(
    state: OperatingState,
    level: bool,
) -> Option<(OperatingState, Option<PowerMode>)> {
    match (state, level) {
        (OperatingState::TrxOff, true) => Some((OperatingState::Sleep, Some(PowerMode::Off))),
        (OperatingState::PllOn, true) => Some((OperatingState::BusyTx, None)),
        (OperatingState::TxAretOn, true) => Some((OperatingState::BusyTxAret, None)),
        (OperatingState::Sleep, false) => Some((OperatingState::TrxOff, Some(PowerMode::Idle))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FramerAction::{Keep, Start, Stop};

    #[test]
    fn every_state_accepts_every_command() {
        for state in OperatingState::ALL {
            for command in Command::ALL {
                let transition = on_command(state, command);
                let expected = match command {
                    Command::Nop => state,
                    Command::TxStart => OperatingState::BusyTx,
                    Command::ForceTrxOff | Command::TrxOff => OperatingState::TrxOff,
                    Command::ForcePllOn | Command::TxOn => OperatingState::PllOn,
                    Command::RxOn => OperatingState::RxOn,
                    Command::RxAackOn => OperatingState::RxAackOn,
                    Command::TxAretOn => OperatingState::BusyTxAret,
                };
                assert_eq!(transition.next, expected, "{:?} + {:?}", state, command);
            }
        }
    }

    #[test]
    fn framer_actions() {
        let rx_on = on_command(OperatingState::TrxOff, Command::RxOn);
        assert_eq!(rx_on.next, OperatingState::RxOn);
        assert_eq!((rx_on.transmitter, rx_on.receiver), (Stop, Start));
        assert!(!rx_on.trac_invalid);

        let aret = on_command(OperatingState::RxAackOn, Command::TxAretOn);
        assert_eq!(aret.next, OperatingState::BusyTxAret);
        assert_eq!((aret.transmitter, aret.receiver), (Start, Stop));
        assert!(aret.trac_invalid);

        let off = on_command(OperatingState::BusyRx, Command::ForceTrxOff);
        assert_eq!((off.transmitter, off.receiver), (Stop, Stop));

        let pll = on_command(OperatingState::RxOn, Command::ForcePllOn);
        assert_eq!((pll.transmitter, pll.receiver), (Keep, Keep));
    }

    #[test]
    fn sleep_pin_edges() {
        assert_eq!(
            on_sleep_pin(OperatingState::TrxOff, true),
            Some((OperatingState::Sleep, Some(PowerMode::Off)))
        );
        assert_eq!(
            on_sleep_pin(OperatingState::Sleep, false),
            Some((OperatingState::TrxOff, Some(PowerMode::Idle)))
        );
        assert_eq!(
            on_sleep_pin(OperatingState::PllOn, true),
            Some((OperatingState::BusyTx, None))
        );
        assert_eq!(on_sleep_pin(OperatingState::RxOn, true), None);
        assert_eq!(on_sleep_pin(OperatingState::TrxOff, false), None);
    }
}
