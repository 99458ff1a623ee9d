use cast::{i16, u16};

/// I2C slave address
pub const I2C_SAD: u8 = 0x23;

// === Device_ID (01h) ===

/// Device_ID device identification register
pub const DEVICE_ID: u8 = 0x44;

/// Settle time after CONFIG reset, in milliseconds
pub const RESET_SETTLE_MS: u32 = 500;

/// Register pair holding one 16-bit two's complement channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WordReg {
    /// High byte register
    pub high: u8,
    /// Low byte register
    pub low: u8,
}

const fn word(high: u8, low: u8) -> WordReg {
    WordReg { high, low }
}

/// Pitch channel encoding
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PitchReg {
    /// Full 16-bit signed value
    Word(WordReg),
    /// Single byte biased by +90 degrees, values above 180 are invalid
    Biased(u8),
}

/// CONFIG register values
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConfigValues {
    /// Written first, starts the internal reset
    pub reset: u8,
    /// Written after the settle time
    pub enable: u8,
    /// `FilterMode` is added to `enable`
    pub filter_select: bool,
}

/// Register map of one sensor layout
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegisterMap {
    /// `Device_ID`
    pub device_id: u8,
    /// `Device_CONFIG`
    pub config: u8,
    /// `ROLL_H`, `ROLL_L`
    pub roll: WordReg,
    /// `PITCH_*`
    pub pitch: PitchReg,
    /// `YAW_H`, `YAW_L`
    pub yaw: WordReg,
    /// `GYRO_X/Y/Z_H`, `GYRO_X/Y/Z_L`
    pub gyro: [WordReg; 3],
    /// `ACCEL_X/Y/Z_H`, `ACCEL_X/Y/Z_L`
    pub accel: [WordReg; 3],
    /// `Temp`
    pub temp: Option<u8>,
    /// CONFIG reset and enable values
    pub values: ConfigValues,
}

/// Layout A: little-endian register pairs, 16-bit pitch
pub static LAYOUT_A: RegisterMap = RegisterMap {
    device_id: 0x01,
    config: 0x02,
    roll: word(0x04, 0x03),
    pitch: PitchReg::Word(word(0x06, 0x05)),
    yaw: word(0x08, 0x07),
    gyro: [word(0x0A, 0x09), word(0x0C, 0x0B), word(0x0E, 0x0D)],
    accel: [word(0x10, 0x0F), word(0x12, 0x11), word(0x14, 0x13)],
    temp: None,
    values: ConfigValues {
        reset: 0x02,
        enable: 0x01,
        filter_select: false,
    },
};

/// Layout B: big-endian register pairs, biased 8-bit pitch, temperature
pub static LAYOUT_B: RegisterMap = RegisterMap {
    device_id: 0x01,
    config: 0x02,
    roll: word(0x03, 0x04),
    pitch: PitchReg::Biased(0x07),
    yaw: word(0x05, 0x06),
    gyro: [word(0x08, 0x09), word(0x0A, 0x0B), word(0x0C, 0x0D)],
    accel: [word(0x0E, 0x0F), word(0x10, 0x11), word(0x12, 0x13)],
    temp: Some(0x14),
    values: ConfigValues {
        reset: 0x08,
        enable: 0x04,
        filter_select: true,
    },
};

/// Register layout selection
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// Layout A, 16-bit pitch
    #[default]
    A,
    /// Layout B, 8-bit biased pitch, on-chip filter selection, temperature
    B,
}

impl Layout {
    /// Register map of this layout
    pub(crate) fn map(self) -> &'static RegisterMap {
        match self {
            Layout::A => &LAYOUT_A,
            Layout::B => &LAYOUT_B,
        }
    }
}

/// On-chip filter selection, Layout B only
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterMode {
    /// No filtering
    #[default]
    None = 0,
    /// Gyroscope integration only
    Gyro = 1,
    /// Complementary filter
    Complementary = 2,
    /// Kalman filter
    Kalman = 3,
}

impl ConfigValues {
    /// CONFIG value enabling the sensor
    pub fn enable_value(&self, filter: Option<FilterMode>) -> u8 {
        if self.filter_select {
            self.enable + filter.unwrap_or_default() as u8
        } else {
            self.enable
        }
    }
}

/// Combine high and low byte into a two's complement 16-bit value
#[inline]
pub fn decode_word(high: u8, low: u8) -> i16 {
    ((u16(high) << 8) | u16(low)) as i16
}

/// Sentinel returned for a biased pitch byte out of range
pub const PITCH_INVALID: i16 = -1;

const PITCH_BIAS: i16 = 90;
const PITCH_RAW_MAX: u8 = 180;

/// Decode a +90 biased pitch byte
#[inline]
pub fn decode_biased_pitch(raw: u8) -> i16 {
    if raw > PITCH_RAW_MAX {
        PITCH_INVALID
    } else {
        i16(raw) - PITCH_BIAS
    }
}
