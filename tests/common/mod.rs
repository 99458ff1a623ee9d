#![allow(dead_code, unused_imports)]

use core::cell::RefCell;

pub use mxmotion::{Axis, FilterMode, InitStatus, Layout, MxMotion, Orientation, SlaveAddr};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use embedded_hal_mock as hal;
pub use hal::eh1::delay::NoopDelay;
pub use hal::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

pub const DEV_ADDR: u8 = 0x23;

pub fn trans_device_id() -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![0x01], vec![0x44])
}

pub fn trans_read(reg: u8, val: u8) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![reg], vec![val])
}

pub fn trans_write(reg: u8, val: u8) -> I2cTrans {
    I2cTrans::write(DEV_ADDR, vec![reg, val])
}

/// Bus traffic and delays as seen by the simulated sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Read { addr: u8, reg: u8 },
    Write { addr: u8, reg: u8, val: u8 },
    DelayMs(u32),
    DelayNs(u32),
}

pub struct SimDevice {
    pub addr: u8,
    pub regs: [u8; 32],
}

impl SimDevice {
    pub fn new(addr: u8) -> Self {
        let mut regs = [0u8; 32];
        regs[0x01] = 0x44;
        Self { addr, regs }
    }

    pub fn with(mut self, reg: u8, val: u8) -> Self {
        self.regs[reg as usize] = val;
        self
    }
}

#[derive(Default)]
pub struct SimState {
    pub devices: Vec<SimDevice>,
    pub log: Vec<Event>,
}

impl SimState {
    pub fn new(devices: Vec<SimDevice>) -> RefCell<Self> {
        RefCell::new(Self {
            devices,
            log: Vec::new(),
        })
    }

    pub fn device(&self, addr: u8) -> &SimDevice {
        self.devices.iter().find(|d| d.addr == addr).unwrap()
    }

    pub fn writes(&self) -> Vec<Event> {
        self.log
            .iter()
            .copied()
            .filter(|e| matches!(e, Event::Write { .. }))
            .collect()
    }
}

/// Shared I2C bus with register-file devices behind it
#[derive(Clone, Copy)]
pub struct SimBus<'a>(pub &'a RefCell<SimState>);

impl ErrorType for SimBus<'_> {
    type Error = ErrorKind;
}

impl I2c for SimBus<'_> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        let SimState { devices, log } = &mut *state;
        let dev = devices
            .iter_mut()
            .find(|d| d.addr == address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;
        let mut pointer = 0usize;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let (reg, data) = bytes
                        .split_first()
                        .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))?;
                    pointer = *reg as usize;
                    for val in data {
                        log.push(Event::Write {
                            addr: address,
                            reg: pointer as u8,
                            val: *val,
                        });
                        dev.regs[pointer] = *val;
                        pointer += 1;
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        log.push(Event::Read {
                            addr: address,
                            reg: pointer as u8,
                        });
                        *b = dev.regs[pointer];
                        pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that only records into the bus log
pub struct SimDelay<'a>(pub &'a RefCell<SimState>);

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().log.push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().log.push(Event::DelayMs(ms));
    }
}
