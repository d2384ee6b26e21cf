pub mod regs;
pub mod types;
pub mod recipe;
pub mod decode;
pub mod device;
pub mod task;

pub use device::Bc80;
pub use task::{bc80_int_task, bc80_task, dispatch_command};
pub use types::{AdcReadings, Bc80Config, CableType, Error, IrqStatus, OpMode, RegisterDump};
