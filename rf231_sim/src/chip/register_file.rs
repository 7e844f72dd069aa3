use super::registers::{self, ieee_addr, irq_status, ADDR_MASK, NUM_REGISTERS};

#[derive(Debug, Clone)]
pub struct RegisterFile {
    values: [u8; NUM_REGISTERS],
}

impl RegisterFile {
    pub fn new(ieee_address: &[u8; ieee_addr::LEN]) -> Self {
        let mut file = Self {
            values: [0; NUM_REGISTERS],
        };
        file.reset(ieee_address);
        file
    }

    pub fn reset(&mut self, ieee_address: &[u8; ieee_addr::LEN]) {
        for (address, value) in self.values.iter_mut().enumerate() {
            *value = registers::reset_value(address as u8);
        }
        let start = usize::from(ieee_addr::ADDR_0);
        self.values[start..start + ieee_addr::LEN].copy_from_slice(ieee_address);
    }

    /// Register value without read side effects.
    pub fn get(&self, address: u8) -> u8 {
        self.values[usize::from(address & ADDR_MASK)]
    }

    pub fn set(&mut self, address: u8, value: u8) {
        self.values[usize::from(address & ADDR_MASK)] = value;
    }

    pub fn modify<U>(&mut self, address: u8, closure: U)
    where
        U: Fn(u8) -> u8,
    {
        let value = closure(self.get(address));
        self.set(address, value);
    }

    /// Register read as seen by the MCU. Reading IRQ_STATUS acknowledges all interrupts.
    pub fn read(&mut self, address: u8) -> u8 {
        let value = self.get(address);
        if address & ADDR_MASK == irq_status::ADDR {
            self.set(address, 0);
        }
        value
    }

    pub fn get_many<const N: usize>(&self, first: u8) -> [u8; N] {
        let mut bytes = [0; N];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.get(first.wrapping_add(offset as u8));
        }
        bytes
    }
}
