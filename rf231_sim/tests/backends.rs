mod common;

use anyhow::Result;

use common::*;
use rf231_sim::access::memory_mapped::{trxpr, TRANSCEIVER_BASE, TRXFBEND, TRXFBST};
use rf231_sim::chip::registers::{self, rfa1_vectors};
use rf231_sim::config_protocol::command_byte;
use rf231_sim::{
    AccessError, Command, MemoryMappedRadio, OperatingState, PowerMode, RadioChip, RadioConfig,
    RegisterAccess, Variant,
};
use rf231_sim_lib::frame::{Address, Header};
use rf231_sim_lib::radio::irq;

const IEEE: [u8; 8] = [0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE];

fn register(address: u8) -> u16 {
    TRANSCEIVER_BASE + u16::from(address)
}

fn transmitted(image: &[u8]) -> Vec<u8> {
    let mut sender = spi_radio(5);
    sender.command(Command::TxStart);
    sender.upload_frame(image);
    drain(sender.chip_mut())
}

#[test]
fn memory_mapped_transmits_like_spi() -> Result<()> {
    let image = data_frame(0x10, PAN, RECEIVER, false, &[1, 2, 3]);

    let mut rfa1 = memory_mapped_radio();
    rfa1.write(register(registers::irq_mask::ADDR), irq::TRX_END)?;
    rfa1.write(register(registers::trx_state::ADDR), Command::TxStart.bits())?;
    for (offset, byte) in image.iter().enumerate() {
        rfa1.write(TRXFBST + offset as u16, *byte)?;
    }

    let wire = drain(rfa1.chip_mut());
    assert_eq!(wire, transmitted(&image));
    assert_eq!(rfa1.chip().host().interrupts, [rfa1_vectors::TX_END]);
    assert_eq!(
        rfa1.read(register(registers::trx_status::ADDR))?,
        OperatingState::PllOn.bits()
    );
    Ok(())
}

#[test]
fn memory_mapped_receive() -> Result<()> {
    let image = data_frame(0x10, PAN, RECEIVER, false, &[1, 2, 3]);
    let wire = transmitted(&image);

    let mut rfa1 = memory_mapped_radio();
    rfa1.write(
        register(registers::irq_mask::ADDR),
        irq::RX_START | irq::TRX_END,
    )?;
    rfa1.write(register(registers::trx_state::ADDR), Command::RxOn.bits())?;
    deliver(rfa1.chip_mut(), &wire);

    assert_eq!(
        rfa1.chip().host().interrupts,
        [rfa1_vectors::RX_START, rfa1_vectors::RX_END]
    );
    // The length lives in TST_RX_LENGTH, TRXFBST holds the first PSDU octet
    assert_eq!(rfa1.read(0x17B)?, image[0]);
    assert_eq!(rfa1.read(TRXFBST)?, image[1]);
    assert_eq!(rfa1.read(TRXFBST + 2)?, 0x10);
    assert_eq!(rfa1.read(TRXFBEND)?, 0);

    // Index 0 of the interface view is still the PHR
    assert_eq!(rfa1.read_frame_buffer(0), image[0]);
    assert_eq!(rfa1.read_frame_buffer(10), 1);
    let mut frame = [0u8; 128];
    assert_eq!(rfa1.download_frame(&mut frame), image.len() + 2);
    assert_eq!(frame[..image.len()], image[..]);

    // Loading a frame for transmission puts the PHR back at TRXFBST
    rfa1.write(TRXFBST, 0x05)?;
    assert_eq!(rfa1.read(TRXFBST)?, 0x05);
    assert_eq!(rfa1.read(TRXFBST + 3)?, 0x10);
    Ok(())
}

#[test]
fn long_address_match() -> Result<()> {
    let image = Header::data(
        0x44,
        PAN,
        Address::Long(u64::from_le_bytes(IEEE)),
        Address::Short(SENDER),
    )
    .frame_image(&[0x99])
    .expect("frame fits in the frame buffer");
    let wire = transmitted(&image);

    let config = RadioConfig::memory_mapped().with_ieee_address(IEEE);
    let mut rfa1 = MemoryMappedRadio::new(RadioChip::new(&config, Recorder::default()));
    rfa1.write(
        register(registers::irq_mask::ADDR),
        irq::RX_START | irq::TRX_END | irq::AMI,
    )?;
    rfa1.write(register(registers::pan_id::ADDR_0), PAN.to_le_bytes()[0])?;
    rfa1.write(register(registers::pan_id::ADDR_1), PAN.to_le_bytes()[1])?;
    rfa1.command(Command::RxAackOn);
    deliver(rfa1.chip_mut(), &wire);

    assert_eq!(
        rfa1.chip().host().interrupts,
        [
            rfa1_vectors::RX_START,
            rfa1_vectors::XAH_AMI,
            rfa1_vectors::RX_END
        ]
    );
    Ok(())
}

#[test]
fn trxpr_controls_sleep_and_reset() -> Result<()> {
    let mut rfa1 = memory_mapped_radio();
    rfa1.write(trxpr::ADDR, trxpr::SLPTR)?;
    assert_eq!(rfa1.chip().state(), OperatingState::Sleep);
    assert_eq!(rfa1.read(trxpr::ADDR)?, trxpr::SLPTR);
    rfa1.write(trxpr::ADDR, 0)?;
    assert_eq!(rfa1.chip().state(), OperatingState::TrxOff);

    rfa1.write(register(registers::phy_cc_cca::ADDR), 0x2F)?;
    rfa1.write(register(registers::trx_state::ADDR), Command::RxOn.bits())?;
    rfa1.write(trxpr::ADDR, trxpr::TRXRST)?;
    assert_eq!(rfa1.read(trxpr::ADDR)?, 0);
    assert_eq!(rfa1.read(register(registers::phy_cc_cca::ADDR))?, 0x2B);
    assert_eq!(rfa1.chip().state(), OperatingState::TrxOff);
    assert_eq!(
        rfa1.chip().host().power,
        [
            PowerMode::Off,
            PowerMode::Idle,
            PowerMode::Receive,
            PowerMode::Idle
        ]
    );
    Ok(())
}

#[test]
fn unmapped_addresses() {
    let mut rfa1 = memory_mapped_radio();
    assert_eq!(rfa1.read(0x13F), Err(AccessError::Unmapped(0x13F)));
    assert_eq!(rfa1.write(0x200, 1), Err(AccessError::Unmapped(0x200)));
}

#[test]
fn spi_needs_select_and_reset_released() {
    let mut radio = spi_radio(5);
    // Deselected, nothing is decoded
    assert_eq!(radio.exchange(command_byte::register_read(0x01)), 0);
    assert_eq!(radio.exchange(0), 0);

    radio.set_cs(false);
    assert_eq!(radio.exchange(command_byte::register_read(0x01)), 0);
    assert_eq!(radio.exchange(0), 0x08);
    // A register access carries a single data byte
    assert_eq!(radio.exchange(0), 0);
    radio.set_cs(true);

    radio.set_rstn(false);
    radio.set_cs(false);
    assert_eq!(radio.exchange(command_byte::register_read(0x1C)), 0);
    assert_eq!(radio.exchange(0), 0);
    radio.set_cs(true);
    radio.set_rstn(true);

    assert_eq!(radio.read_register(registers::part_num::ADDR), 0x03);
}

#[test]
fn spi_frame_buffer_stream() {
    let image = data_frame(0x21, PAN, RECEIVER, false, &[7]);
    let wire = transmitted(&image);

    let mut radio = spi_radio(5);
    radio.command(Command::RxOn);
    deliver(radio.chip_mut(), &wire);

    let mut bytes = [command_byte::FRAME_BUFFER_READ, 0, 0, 0, 0];
    radio.transfer(&mut bytes);
    assert_eq!(bytes, [0, image[0], image[1], image[2], image[3]]);

    // SRAM access starts anywhere and wraps within the buffer
    let mut bytes = [command_byte::SRAM_READ, 3, 0];
    radio.transfer(&mut bytes);
    assert_eq!(bytes[2], 0x21);

    let mut bytes = [command_byte::SRAM_WRITE, 0x7F, 0xAA, 0xBB];
    radio.transfer(&mut bytes);
    assert_eq!(radio.read_frame_buffer(0x7F), 0xAA);
    assert_eq!(radio.read_frame_buffer(0), 0xBB);
}

#[test]
fn sleep_pin_from_pll_on() {
    let mut radio = spi_radio(5);
    radio.command(Command::TxOn);
    assert_eq!(radio.chip().state(), OperatingState::PllOn);

    radio.set_sleep(true);
    assert_eq!(radio.chip().state(), OperatingState::BusyTx);
    // Only the state follows the pin
    assert!(!radio.chip().is_transmitting());

    radio.set_sleep(false);
    assert_eq!(radio.chip().state(), OperatingState::BusyTx);
}

#[test]
fn config_drives_construction() -> Result<()> {
    let config = RadioConfig::memory_mapped()
        .with_ieee_address(IEEE)
        .with_seed(42);
    let mut buffer = [0u8; 32];
    let restored = RadioConfig::from_bytes(config.to_slice(&mut buffer)?)?;
    assert_eq!(restored, config);

    let mut rfa1 = MemoryMappedRadio::new(RadioChip::new(&restored, Recorder::default()));
    assert_eq!(rfa1.chip().variant(), Variant::Atmega128rfa1);
    assert_eq!(rfa1.read(register(registers::ieee_addr::ADDR_0))?, 0x10);
    assert_eq!(rfa1.read(register(registers::ieee_addr::ADDR_0 + 7))?, 0xFE);

    // IEEE address survives a reset
    rfa1.reset();
    assert_eq!(rfa1.read(register(registers::ieee_addr::ADDR_0 + 7))?, 0xFE);
    Ok(())
}

#[test]
fn same_seed_same_lqi() {
    let image = data_frame(0x21, PAN, RECEIVER, false, &[7, 8]);
    let wire = transmitted(&image);

    let lqi = |seed: u64| {
        let config = RadioConfig::spi(1).with_seed(seed);
        let mut chip = RadioChip::new(&config, Recorder::default());
        chip.command(Command::RxOn.bits());
        deliver(&mut chip, &wire);
        chip.frame_buffer().peek(usize::from(image[0]))
    };
    assert_eq!(lqi(7), lqi(7));
}
