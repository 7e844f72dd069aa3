#![no_std]

pub mod crc;
pub mod frame;

pub mod radio {
    use serde::{Deserialize, Serialize};

    /// Value reported in the TRX_STATUS register for each operating state.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    pub enum OperatingState {
        BusyRx = 0x01,
        BusyTx = 0x02,
        RxOn = 0x06,
        TrxOff = 0x08,
        PllOn = 0x09,
        Sleep = 0x0F,
        BusyRxAack = 0x11,
        BusyTxAret = 0x12,
        RxAackOn = 0x16,
        TxAretOn = 0x19,
        Transition = 0x1F,
    }

    impl OperatingState {
        pub const ALL: [OperatingState; 11] = [
            OperatingState::BusyRx,
            OperatingState::BusyTx,
            OperatingState::RxOn,
            OperatingState::TrxOff,
            OperatingState::PllOn,
            OperatingState::Sleep,
            OperatingState::BusyRxAack,
            OperatingState::BusyTxAret,
            OperatingState::RxAackOn,
            OperatingState::TxAretOn,
            OperatingState::Transition,
        ];

        pub const fn bits(self) -> u8 {
            self as u8
        }
    }

    impl TryFrom<u8> for OperatingState {
        type Error = Error;

        fn try_from(value: u8) -> Result<Self, Self::Error> {
            OperatingState::ALL
                .iter()
                .copied()
                .find(|state| state.bits() == value)
                .ok_or(Error::UnknownState(value))
        }
    }

    /// TRX_CMD values accepted through the TRX_STATE register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Command {
        Nop,
        TxStart,
        ForceTrxOff,
        ForcePllOn,
        RxOn,
        TrxOff,
        TxOn,
        RxAackOn,
        TxAretOn,
    }

    impl Command {
        pub const ALL: [Command; 9] = [
            Command::Nop,
            Command::TxStart,
            Command::ForceTrxOff,
            Command::ForcePllOn,
            Command::RxOn,
            Command::TrxOff,
            Command::TxOn,
            Command::RxAackOn,
            Command::TxAretOn,
        ];

        pub const fn bits(self) -> u8 {
            match self {
                Command::Nop => 0x00,
                Command::TxStart => 0x02,
                Command::ForceTrxOff => 0x03,
                Command::ForcePllOn => 0x04,
                Command::RxOn => 0x06,
                Command::TrxOff => 0x08,
                Command::TxOn => 0x09,
                Command::RxAackOn => 0x16,
                Command::TxAretOn => 0x19,
            }
        }
    }

    impl TryFrom<u8> for Command {
        type Error = Error;

        fn try_from(value: u8) -> Result<Self, Self::Error> {
            Command::ALL
                .iter()
                .copied()
                .find(|command| command.bits() == value)
                .ok_or(Error::UnknownCommand(value))
        }
    }

    /// Pending acknowledgement scheduled by the receiver for the transmitter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum SendAck {
        #[default]
        None,
        Normal,
        Pend,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Variant {
        /// SPI attached AT86RF230/231.
        #[default]
        At86rf231,
        /// Transceiver embedded in the ATmega128RFA1, accessed through data memory.
        Atmega128rfa1,
    }

    /// Interrupt sources raised by the model.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RadioEvent {
        PllUnlock,
        RxStart,
        RxEnd,
        TxEnd,
        AddressMatch,
        Underrun,
    }

    impl RadioEvent {
        /// Bit in IRQ_MASK / IRQ_STATUS. Frame ends share TRX_END in both directions.
        pub const fn status_bit(self) -> u8 {
            match self {
                RadioEvent::PllUnlock => irq::PLL_UNLOCK,
                RadioEvent::RxStart => irq::RX_START,
                RadioEvent::RxEnd | RadioEvent::TxEnd => irq::TRX_END,
                RadioEvent::AddressMatch => irq::AMI,
                RadioEvent::Underrun => irq::TRX_UR,
            }
        }
    }

    pub mod irq {
        pub const PLL_LOCK: u8 = 1 << 0;
        pub const PLL_UNLOCK: u8 = 1 << 1;
        pub const RX_START: u8 = 1 << 2;
        pub const TRX_END: u8 = 1 << 3;
        pub const CCA_ED_DONE: u8 = 1 << 4;
        pub const AMI: u8 = 1 << 5;
        pub const TRX_UR: u8 = 1 << 6;
        pub const BAT_LOW: u8 = 1 << 7;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Error {
        UnknownCommand(u8),
        UnknownState(u8),
    }
}
