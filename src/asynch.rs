//! Asynchronous version of the driver.
//!
//! Requires enabling the `async` feature.

use core::fmt::Debug;

use accelerometer::vector::I16x3;
use accelerometer::{Error, ErrorKind};
use embedded_hal_async as hal;
use hal::delay::DelayNs;
use hal::i2c::{ErrorType, I2c};

use crate::{reg::*, Axis, Euler, InitStatus, Orientation, SlaveAddr};

/// Asynchronous `MxMotion` driver
pub struct MxMotion<I2C> {
    /// The concrete I²C device implementation
    pub(crate) i2c: I2C,
    /// The I²C device slave address
    pub(crate) addr: u8,
    /// Register layout
    pub(crate) layout: Layout,
    /// Register map of `layout`
    pub(crate) map: &'static RegisterMap,
}

impl<I2C, E> MxMotion<I2C>
where
    I2C: I2c + ErrorType<Error = E>,
    E: Debug,
{
    /// Create a new `MxMotion` driver from the given `I2C` peripheral
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

    /// Start up the sensor, see [`crate::MxMotion::init`]
    pub async fn init<D>(
        &mut self,
        delay: &mut D,
        filter: Option<FilterMode>,
    ) -> Result<InitStatus, Error<E>>
    where
        D: DelayNs,
    {
        let id = self.get_device_id().await?;
        if id != DEVICE_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected Device_ID {=u8:#x}, skipping setup", id);
            return Ok(InitStatus::UnknownDevice(id));
        }

        let values = self.map.values;
        self.write_reg(self.map.config, values.reset).await?;
        delay.delay_ms(RESET_SETTLE_MS).await;
        let enable = values.enable_value(filter);
        self.write_reg(self.map.config, enable).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("CONFIG enabled with {=u8:#x}", enable);

        Ok(InitStatus::Enabled)
    }

    /// `Device_ID` register
    pub async fn get_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(self.map.device_id).await.map_err(Into::into)
    }

    /// `Device_CONFIG` register
    pub async fn get_config(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(self.map.config).await.map_err(Into::into)
    }

    /// Euler angle, see [`crate::MxMotion::read_orientation`]
    pub async fn read_orientation(&mut self, orientation: Orientation) -> Result<i16, Error<E>> {
        let value = match orientation {
            Orientation::Roll => self.read_word(self.map.roll).await?,
            Orientation::Pitch => match self.map.pitch {
                PitchReg::Word(regs) => self.read_word(regs).await?,
                PitchReg::Biased(reg) => decode_biased_pitch(self.read_reg(reg).await?),
            },
            Orientation::Yaw => self.read_word(self.map.yaw).await?,
        };
        Ok(value)
    }

    /// Roll, pitch and yaw, in that order
    pub async fn read_euler(&mut self) -> Result<Euler, Error<E>> {
        Ok(Euler {
            roll: self.read_orientation(Orientation::Roll).await?,
            pitch: self.read_orientation(Orientation::Pitch).await?,
            yaw: self.read_orientation(Orientation::Yaw).await?,
        })
    }

    /// Linear acceleration in raw counts,
    /// `ACCEL_n_H:ACCEL_n_L`
    pub async fn read_acceleration(&mut self, axis: Axis) -> Result<i16, Error<E>> {
        self.read_word(self.map.accel[axis as usize])
            .await
            .map_err(Into::into)
    }

    /// Linear acceleration of all axes in raw counts
    pub async fn accel_raw(&mut self) -> Result<I16x3, Error<E>> {
        Ok(I16x3::new(
            self.read_acceleration(Axis::X).await?,
            self.read_acceleration(Axis::Y).await?,
            self.read_acceleration(Axis::Z).await?,
        ))
    }

    /// Angular rate in raw counts,
    /// `GYRO_n_H:GYRO_n_L`
    pub async fn read_angular_rate(&mut self, axis: Axis) -> Result<i16, Error<E>> {
        self.read_word(self.map.gyro[axis as usize])
            .await
            .map_err(Into::into)
    }

    /// Angular rate of all axes in raw counts
    pub async fn read_angular_rate_all(&mut self) -> Result<I16x3, Error<E>> {
        Ok(I16x3::new(
            self.read_angular_rate(Axis::X).await?,
            self.read_angular_rate(Axis::Y).await?,
            self.read_angular_rate(Axis::Z).await?,
        ))
    }

    /// Raw temperature byte,
    /// `Temp`, Layout B only
    pub async fn read_temperature_raw(&mut self) -> Result<u8, Error<E>> {
        match self.map.temp {
            Some(reg) => self.read_reg(reg).await.map_err(Into::into),
            None => Err(Error::new(ErrorKind::Mode)),
        }
    }

    #[inline]
    async fn read_word(&mut self, regs: WordReg) -> Result<i16, E> {
        let high = self.read_reg(regs.high).await?;
        let low = self.read_reg(regs.low).await?;
        Ok(decode_word(high, low))
    }

    #[inline]
    async fn read_reg(&mut self, reg: u8) -> Result<u8, E> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg], &mut buf).await?;
        Ok(buf[0])
    }

    #[inline]
    async fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg, val]).await
    }
}
