use std::io::{self, Read, Write};

use bitflags::bitflags;
use nyan_core::DecodeError;
use nyan_core::binary::{ReadBinaryExt, WriteBinaryExt};

bitflags! {
    /// Gameplay modifiers active during a play.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u16 {
        const HIDDEN_FURIGANA = 1 << 0;
        const NO_SLOPPY = 1 << 1;
        const SUDDEN_DEATH = 1 << 2;
        const KATAKANA_INPUT = 1 << 3;
        const AUTO_ADVANCE = 1 << 4;
    }
}

/// One finished play.
#[derive(Debug, Clone, PartialEq)]
pub struct HighScore {
    pub username: String,
    pub score: u32,
    pub correct: u16,
    pub sloppy: u16,
    pub miss: u16,
    pub combo: u16,
    /// Percentage, stored with two decimals of precision.
    pub accuracy: f32,
    pub mods: Mods,
    pub rank: i8,
    /// Unix seconds.
    pub timestamp: u64,
}

impl HighScore {
    fn accuracy_to_stored(accuracy: f32) -> u16 {
        (accuracy * 100.0).round().clamp(0.0, 10_000.0) as u16
    }

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_string(&self.username)?;
        w.write_u32_le(self.score)?;
        w.write_u16_le(self.correct)?;
        w.write_u16_le(self.sloppy)?;
        w.write_u16_le(self.miss)?;
        w.write_u16_le(self.combo)?;
        w.write_u16_le(Self::accuracy_to_stored(self.accuracy))?;
        w.write_u16_le(self.mods.bits())?;
        w.write_byte(self.rank as u8)?;
        w.write_u64_le(self.timestamp)
    }

    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        Ok(Self {
            username: r.read_string()?,
            score: r.read_u32_le()?,
            correct: r.read_u16_le()?,
            sloppy: r.read_u16_le()?,
            miss: r.read_u16_le()?,
            combo: r.read_u16_le()?,
            accuracy: f32::from(r.read_u16_le()?) / 100.0,
            mods: Mods::from_bits_retain(r.read_u16_le()?),
            rank: r.read_byte()? as i8,
            timestamp: r.read_u64_le()?,
        })
    }
}
