pub mod regs;
pub mod types;
pub mod device;

pub use device::ForceSensor;
pub use types::{check_image_len, FirmwareImage, FwError, IrqControl, UpdateOutcome};
