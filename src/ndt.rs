//! Raw register port framed as `[reg][data...]`.
//!
//! A write frame of just `[reg]` moves the read pointer; a longer frame
//! writes `data` to consecutive registers starting at `reg`. Reads return
//! consecutive registers from the read pointer.

use crate::config::MAX_BULK_WRITE;
use crate::regmap::RegisterMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NdtError<E> {
    Bus(E),
    /// Empty frame, or payload longer than `MAX_BULK_WRITE`.
    InvalidInput,
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for NdtError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            NdtError::Bus(_) => defmt::write!(f, "Bus(..)"),
            NdtError::InvalidInput => defmt::write!(f, "InvalidInput"),
        }
    }
}

pub struct NdtPort<R> {
    regmap: R,
    read_ptr: u8,
}

impl<R> NdtPort<R>
where
    R: RegisterMap,
{
    pub fn new(regmap: R) -> Self {
        Self { regmap, read_ptr: 0 }
    }

    pub fn release(self) -> R {
        self.regmap
    }

    pub fn read_pointer(&self) -> u8 {
        self.read_ptr
    }

    /// Returns the number of payload bytes written.
    pub async fn write(&mut self, frame: &[u8]) -> Result<usize, NdtError<R::Error>> {
        let (&reg, data) = frame.split_first().ok_or(NdtError::InvalidInput)?;
        if data.len() > MAX_BULK_WRITE {
            return Err(NdtError::InvalidInput);
        }
        self.read_ptr = reg;
        if data.is_empty() {
            trace!("NDT: read pointer -> 0x{:02X}", reg);
            return Ok(0);
        }
        trace!("NDT: write {} bytes @0x{:02X}", data.len(), reg);
        self.regmap.bulk_write(reg, data).await.map_err(NdtError::Bus)?;
        Ok(data.len())
    }

    /// Fill `buf` from the read pointer. Returns the bytes read.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NdtError<R::Error>> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.regmap
            .bulk_read(self.read_ptr, buf)
            .await
            .map_err(NdtError::Bus)?;
        Ok(buf.len())
    }
}
