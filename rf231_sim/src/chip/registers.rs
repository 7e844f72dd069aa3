pub const NUM_REGISTERS: usize = 0x40;
pub const ADDR_MASK: u8 = 0x3F;

pub mod trx_status {
    pub const ADDR: u8 = 0x01;
}

pub mod trx_state {
    pub const ADDR: u8 = 0x02;
    pub const TRX_CMD_MASK: u8 = 0x1F;
    pub const TRAC_STATUS_MASK: u8 = 0xE0;
    pub const TRAC_INVALID: u8 = 0xE0;
}

pub mod trx_ctrl_0 {
    pub const ADDR: u8 = 0x03;
    pub const RESET: u8 = 0x19;
}

pub mod trx_ctrl_1 {
    pub const ADDR: u8 = 0x04;
    pub const RESET: u8 = 0x20;
    pub const TX_AUTO_CRC_ON: u8 = 1 << 5;
    /// IRQ_STATUS also records masked interrupts for polling.
    pub const IRQ_MASK_MODE: u8 = 1 << 1;
}

pub mod phy_tx_pwr {
    pub const ADDR: u8 = 0x05;
    pub const RESET: u8 = 0xC0;
    pub const TX_PWR_MASK: u8 = 0x0F;

    pub const POWER_DBM: [f32; 16] = [
        3.0, 2.8, 2.3, 1.8, 1.3, 0.7, 0.0, -1.0, -2.0, -3.0, -4.0, -5.0, -7.0, -9.0, -12.0, -17.0,
    ];
}

pub mod phy_rssi {
    pub const ADDR: u8 = 0x06;
    pub const RSSI_MASK: u8 = 0x1F;
}

pub mod phy_ed_level {
    pub const ADDR: u8 = 0x07;
    pub const RESET: u8 = 0xFF;
}

pub mod phy_cc_cca {
    pub const ADDR: u8 = 0x08;
    pub const RESET: u8 = 0x2B;
    pub const CHANNEL_MASK: u8 = 0x1F;
}

pub mod cca_thres {
    pub const ADDR: u8 = 0x09;
    pub const RESET: u8 = 0xC7;
}

pub mod rx_ctrl {
    pub const ADDR: u8 = 0x0A;
    pub const RESET: u8 = 0xB7;
}

pub mod sfd_value {
    pub const ADDR: u8 = 0x0B;
    pub const RESET: u8 = 0xA7;
}

pub mod trx_ctrl_2 {
    pub const ADDR: u8 = 0x0C;
}

pub mod ant_div {
    pub const ADDR: u8 = 0x0D;
    pub const RESET: u8 = 0x03;
}

pub mod irq_mask {
    pub const ADDR: u8 = 0x0E;
}

pub mod irq_status {
    pub const ADDR: u8 = 0x0F;
}

pub mod vreg_ctrl {
    pub const ADDR: u8 = 0x10;
}

pub mod batmon {
    pub const ADDR: u8 = 0x11;
    pub const RESET: u8 = 0x02;
}

pub mod xosc_ctrl {
    pub const ADDR: u8 = 0x12;
    pub const RESET: u8 = 0xF0;
}

pub mod rx_syn {
    pub const ADDR: u8 = 0x15;
}

pub mod xah_ctrl_1 {
    pub const ADDR: u8 = 0x17;
}

pub mod ftn_ctrl {
    pub const ADDR: u8 = 0x18;
    pub const RESET: u8 = 0x58;
}

pub mod xah_ctrl_2 {
    pub const ADDR: u8 = 0x19;
    pub const RESET: u8 = 0x55;
}

pub mod pll_cf {
    pub const ADDR: u8 = 0x1A;
    pub const RESET: u8 = 0x57;
}

pub mod pll_dcu {
    pub const ADDR: u8 = 0x1B;
    pub const RESET: u8 = 0x20;
}

pub mod part_num {
    pub const ADDR: u8 = 0x1C;
    pub const RESET: u8 = 0x03;
}

pub mod version_num {
    pub const ADDR: u8 = 0x1D;
    pub const RESET: u8 = 0x02;
}

pub mod man_id_0 {
    pub const ADDR: u8 = 0x1E;
    pub const RESET: u8 = 0x1F;
}

pub mod man_id_1 {
    pub const ADDR: u8 = 0x1F;
}

pub mod short_addr {
    pub const ADDR_0: u8 = 0x20;
    pub const ADDR_1: u8 = 0x21;
    pub const RESET: u8 = 0xFF;
}

pub mod pan_id {
    pub const ADDR_0: u8 = 0x22;
    pub const ADDR_1: u8 = 0x23;
    pub const RESET: u8 = 0xFF;
}

pub mod ieee_addr {
    pub const ADDR_0: u8 = 0x24;
    pub const LEN: usize = 8;
}

pub mod xah_ctrl_0 {
    pub const ADDR: u8 = 0x2C;
    pub const RESET: u8 = 0x38;
}

pub mod csma_seed_0 {
    pub const ADDR: u8 = 0x2D;
    pub const RESET: u8 = 0xEA;
}

pub mod csma_seed_1 {
    pub const ADDR: u8 = 0x2E;
    pub const RESET: u8 = 0x42;
    pub const AACK_I_AM_COORD: u8 = 1 << 3;
    pub const AACK_DIS_ACK: u8 = 1 << 4;
    pub const AACK_SET_PD: u8 = 1 << 5;
}

pub mod csma_be {
    pub const ADDR: u8 = 0x2F;
    pub const RESET: u8 = 0x53;
}

pub mod tst_rx_length {
    /// Received PHR length, mapped at 0x17B on the ATmega128RFA1.
    pub const ADDR: u8 = 0x3B;
}

pub mod reserved_39 {
    pub const ADDR: u8 = 0x39;
    pub const RESET: u8 = 0x40;
}

/// Interrupt vectors of the ATmega128RFA1 transceiver sources.
pub mod rfa1_vectors {
    pub const PLL_UNLOCK: u8 = 58;
    pub const RX_START: u8 = 60;
    pub const RX_END: u8 = 61;
    pub const XAH_AMI: u8 = 63;
    pub const TX_END: u8 = 64;
}

pub fn reset_value(address: u8) -> u8 {
    match address & ADDR_MASK {
        trx_ctrl_0::ADDR => trx_ctrl_0::RESET,
        trx_ctrl_1::ADDR => trx_ctrl_1::RESET,
        phy_tx_pwr::ADDR => phy_tx_pwr::RESET,
        phy_ed_level::ADDR => phy_ed_level::RESET,
        phy_cc_cca::ADDR => phy_cc_cca::RESET,
        cca_thres::ADDR => cca_thres::RESET,
        rx_ctrl::ADDR => rx_ctrl::RESET,
        sfd_value::ADDR => sfd_value::RESET,
        ant_div::ADDR => ant_div::RESET,
        batmon::ADDR => batmon::RESET,
        xosc_ctrl::ADDR => xosc_ctrl::RESET,
        ftn_ctrl::ADDR => ftn_ctrl::RESET,
        xah_ctrl_2::ADDR => xah_ctrl_2::RESET,
        pll_cf::ADDR => pll_cf::RESET,
        pll_dcu::ADDR => pll_dcu::RESET,
        part_num::ADDR => part_num::RESET,
        version_num::ADDR => version_num::RESET,
        man_id_0::ADDR => man_id_0::RESET,
        short_addr::ADDR_0 | short_addr::ADDR_1 => short_addr::RESET,
        pan_id::ADDR_0 | pan_id::ADDR_1 => pan_id::RESET,
        xah_ctrl_0::ADDR => xah_ctrl_0::RESET,
        csma_seed_0::ADDR => csma_seed_0::RESET,
        csma_seed_1::ADDR => csma_seed_1::RESET,
        csma_be::ADDR => csma_be::RESET,
        reserved_39::ADDR => reserved_39::RESET,
        _ => 0x00,
    }
}

pub fn name(address: u8) -> Option<&'static str> {
    let name = match address & ADDR_MASK {
        trx_status::ADDR => "TRX_STATUS",
        trx_state::ADDR => "TRX_STATE",
        trx_ctrl_0::ADDR => "TRX_CTRL_0",
        trx_ctrl_1::ADDR => "TRX_CTRL_1",
        phy_tx_pwr::ADDR => "PHY_TX_PWR",
        phy_rssi::ADDR => "PHY_RSSI",
        phy_ed_level::ADDR => "PHY_ED_LEVEL",
        phy_cc_cca::ADDR => "PHY_CC_CCA",
        cca_thres::ADDR => "CCA_THRES",
        rx_ctrl::ADDR => "RX_CTRL",
        sfd_value::ADDR => "SFD_VALUE",
        trx_ctrl_2::ADDR => "TRX_CTRL_2",
        ant_div::ADDR => "ANT_DIV",
        irq_mask::ADDR => "IRQ_MASK",
        irq_status::ADDR => "IRQ_STATUS",
        vreg_ctrl::ADDR => "VREG_CTRL",
        batmon::ADDR => "BATMON",
        xosc_ctrl::ADDR => "XOSC_CTRL",
        rx_syn::ADDR => "RX_SYN",
        xah_ctrl_1::ADDR => "XAH_CTRL_1",
        ftn_ctrl::ADDR => "FTN_CTRL",
        xah_ctrl_2::ADDR => "XAH_CTRL_2",
        pll_cf::ADDR => "PLL_CF",
        pll_dcu::ADDR => "PLL_DCU",
        part_num::ADDR => "PART_NUM",
        version_num::ADDR => "VERSION_NUM",
        man_id_0::ADDR => "MAN_ID_0",
        man_id_1::ADDR => "MAN_ID_1",
        short_addr::ADDR_0 => "SHORT_ADDR_0",
        short_addr::ADDR_1 => "SHORT_ADDR_1",
        pan_id::ADDR_0 => "PAN_ID_0",
        pan_id::ADDR_1 => "PAN_ID_1",
        0x24 => "IEEE_ADDR_0",
        0x25 => "IEEE_ADDR_1",
        0x26 => "IEEE_ADDR_2",
        0x27 => "IEEE_ADDR_3",
        0x28 => "IEEE_ADDR_4",
        0x29 => "IEEE_ADDR_5",
        0x2A => "IEEE_ADDR_6",
        0x2B => "IEEE_ADDR_7",
        xah_ctrl_0::ADDR => "XAH_CTRL_0",
        csma_seed_0::ADDR => "CSMA_SEED_0",
        csma_seed_1::ADDR => "CSMA_SEED_1",
        csma_be::ADDR => "CSMA_BE",
        tst_rx_length::ADDR => "TST_RX_LENGTH",
        _ => return None,
    };
    Some(name)
}
