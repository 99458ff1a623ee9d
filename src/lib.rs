//! Platform-agnostic MxMotion 9-axis motion sensor driver which uses I2C via
//! [embedded-hal] and implements the [`RawAccelerometer` trait][trait]
//! from the `accelerometer` crate.
//!
//! The sensor reports orientation (roll, pitch, yaw), linear acceleration and
//! angular rate as raw signed 16-bit counts. Two register layouts exist, see
//! [`Layout`]; one driver handles both.
//!
//! ```ignore
//! let mut sensor = MxMotion::new(i2c, SlaveAddr::Default, Layout::A);
//! if sensor.init(&mut delay, None)?.is_enabled() {
//!     let yaw = sensor.read_orientation(Orientation::Yaw)?;
//!     let ax = sensor.read_acceleration(Axis::X)?;
//! }
//! ```
//!
//! [embedded-hal]: https://docs.rs/embedded-hal
//! [trait]: https://docs.rs/accelerometer/latest/accelerometer/trait.RawAccelerometer.html
//!

#![deny(missing_docs)]
#![deny(warnings)]
#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "async")]
pub mod asynch;
mod reg;

use core::fmt::Debug;

pub use accelerometer::vector::I16x3;
pub use accelerometer::{Error, ErrorKind, RawAccelerometer};
use embedded_hal as hal;
use hal::delay::DelayNs;
use hal::i2c::I2c;

use crate::reg::*;
pub use crate::reg::{FilterMode, Layout, PITCH_INVALID};

/// Possible slave addresses
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveAddr {
    /// Default slave address
    #[default]
    Default,
    /// Alternative 7-bit slave address
    Alternative(u8),
}

impl SlaveAddr {
    pub(crate) fn addr(self) -> u8 {
        match self {
            SlaveAddr::Default => I2C_SAD,
            SlaveAddr::Alternative(addr) => addr,
        }
    }
}

/// Accelerometer and gyroscope axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X = 0,
    /// Y axis
    Y = 1,
    /// Z axis
    Z = 2,
}

impl TryFrom<u8> for Axis {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(ErrorKind::Param),
        }
    }
}

/// Euler angle channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Roll
    Roll = 0,
    /// Pitch
    Pitch = 1,
    /// Yaw
    Yaw = 2,
}

impl TryFrom<u8> for Orientation {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Orientation::Roll),
            1 => Ok(Orientation::Pitch),
            2 => Ok(Orientation::Yaw),
            _ => Err(ErrorKind::Param),
        }
    }
}

/// Euler angles, raw sensor counts
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Euler {
    /// Roll
    pub roll: i16,
    /// Pitch, `PITCH_INVALID` when out of range on Layout B
    pub pitch: i16,
    /// Yaw
    pub yaw: i16,
}

/// Outcome of [`MxMotion::init`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStatus {
    /// Identity matched, sensor reset and enabled
    Enabled,
    /// Identity mismatch, nothing was written; carries the byte read
    UnknownDevice(u8),
}

impl InitStatus {
    /// Sensor was configured
    pub fn is_enabled(self) -> bool {
        self == InitStatus::Enabled
    }
}

/// `MxMotion` driver
pub struct MxMotion<I2C> {
    /// The concrete I²C device implementation
    i2c: I2C,
    /// The I²C device slave address
    addr: u8,
    /// Register layout
    layout: Layout,
    /// Register map of `layout`
    map: &'static RegisterMap,
}

impl<I2C, E> MxMotion<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
{
    /// Create a new `MxMotion` driver from the given `I2C` peripheral,
    /// no bus traffic happens until [`init`](Self::init)
    pub fn new(i2c: I2C, addr: SlaveAddr, layout: Layout) -> Self {
        Self {
            i2c,
            addr: addr.addr(),
            layout,
            map: layout.map(),
        }
    }

    /// Destroy driver instance, return `I2C` bus instance
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Register layout in use
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Start up the sensor.
    ///
    /// Checks `Device_ID`; on a match writes the CONFIG reset value, waits
    /// 500 ms and writes the CONFIG enable value. `filter` is encoded into
    /// CONFIG on Layout B and ignored on Layout A.
    ///
    /// An identity mismatch is reported as [`InitStatus::UnknownDevice`]
    /// and leaves the sensor untouched.
    pub fn init<D>(
        &mut self,
        delay: &mut D,
        filter: Option<FilterMode>,
    ) -> Result<InitStatus, Error<E>>
    where
        D: DelayNs,
    {
        let id = self.get_device_id()?;
        if id != DEVICE_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected Device_ID {=u8:#x}, skipping setup", id);
            return Ok(InitStatus::UnknownDevice(id));
        }

        let values = self.map.values;
        self.write_reg(self.map.config, values.reset)?;
        delay.delay_ms(RESET_SETTLE_MS);
        let enable = values.enable_value(filter);
        self.write_reg(self.map.config, enable)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("CONFIG enabled with {=u8:#x}", enable);

        Ok(InitStatus::Enabled)
    }

    /// `Device_ID` register
    pub fn get_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(self.map.device_id).map_err(Into::into)
    }

    /// `Device_CONFIG` register
    pub fn get_config(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(self.map.config).map_err(Into::into)
    }

    /// Euler angle,
    /// `ROLL_H:ROLL_L`, `PITCH_*`, `YAW_H:YAW_L`.
    /// Layout B pitch yields [`PITCH_INVALID`] for raw values above 180
    pub fn read_orientation(&mut self, orientation: Orientation) -> Result<i16, Error<E>> {
        let value = match orientation {
            Orientation::Roll => self.read_word(self.map.roll)?,
            Orientation::Pitch => match self.map.pitch {
                PitchReg::Word(regs) => self.read_word(regs)?,
                PitchReg::Biased(reg) => decode_biased_pitch(self.read_reg(reg)?),
            },
            Orientation::Yaw => self.read_word(self.map.yaw)?,
        };
        Ok(value)
    }

    /// Roll, pitch and yaw, in that order
    pub fn read_euler(&mut self) -> Result<Euler, Error<E>> {
        Ok(Euler {
            roll: self.read_orientation(Orientation::Roll)?,
            pitch: self.read_orientation(Orientation::Pitch)?,
            yaw: self.read_orientation(Orientation::Yaw)?,
        })
    }

    /// Linear acceleration in raw counts,
    /// `ACCEL_n_H:ACCEL_n_L`
    pub fn read_acceleration(&mut self, axis: Axis) -> Result<i16, Error<E>> {
        self.read_word(self.map.accel[axis as usize])
            .map_err(Into::into)
    }

    /// Angular rate in raw counts,
    /// `GYRO_n_H:GYRO_n_L`
    pub fn read_angular_rate(&mut self, axis: Axis) -> Result<i16, Error<E>> {
        self.read_word(self.map.gyro[axis as usize])
            .map_err(Into::into)
    }

    /// Angular rate of all axes in raw counts
    pub fn read_angular_rate_all(&mut self) -> Result<I16x3, Error<E>> {
        Ok(I16x3::new(
            self.read_angular_rate(Axis::X)?,
            self.read_angular_rate(Axis::Y)?,
            self.read_angular_rate(Axis::Z)?,
        ))
    }

    /// Raw temperature byte,
    /// `Temp`, Layout B only
    pub fn read_temperature_raw(&mut self) -> Result<u8, Error<E>> {
        match self.map.temp {
            Some(reg) => self.read_reg(reg).map_err(Into::into),
            None => Err(Error::new(ErrorKind::Mode)),
        }
    }

    #[inline]
    fn read_word(&mut self, regs: WordReg) -> Result<i16, E> {
        let high = self.read_reg(regs.high)?;
        let low = self.read_reg(regs.low)?;
        Ok(decode_word(high, low))
    }

    #[inline]
    fn read_reg(&mut self, reg: u8) -> Result<u8, E> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg, val])
    }
}

impl<I2C, E> RawAccelerometer<I16x3> for MxMotion<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
{
    type Error = E;

    /// Get acceleration reading from the accelerometer
    fn accel_raw(&mut self) -> Result<I16x3, Error<E>> {
        Ok(I16x3::new(
            self.read_acceleration(Axis::X)?,
            self.read_acceleration(Axis::Y)?,
            self.read_acceleration(Axis::Z)?,
        ))
    }
}
