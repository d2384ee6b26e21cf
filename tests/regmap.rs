mod common;

use common::{FakeI2cRegs, StuckI2c};
use embassy_futures::block_on;

use powerpath_drivers::config::MAX_BULK_WRITE;
use powerpath_drivers::regmap::Error;
use powerpath_drivers::{I2cRegmap, RegisterMap};

const ADDR: u8 = 0x5F;

#[test]
fn single_register_read_and_write() {
    let mut rm = I2cRegmap::new(FakeI2cRegs::new(ADDR), ADDR);
    block_on(rm.write(0x06, 0xA5)).unwrap();
    assert_eq!(block_on(rm.read(0x06)), Ok(0xA5));
    assert_eq!(rm.release().regs[0x06], 0xA5);
}

#[test]
fn bulk_transfers_cover_consecutive_registers() {
    let mut rm = I2cRegmap::new(FakeI2cRegs::new(ADDR), ADDR);
    block_on(rm.bulk_write(0x10, &[1, 2, 3, 4])).unwrap();
    let mut buf = [0u8; 4];
    block_on(rm.bulk_read(0x10, &mut buf)).unwrap();
    assert_eq!(buf, [1, 2, 3, 4]);
}

#[test]
fn update_bits_preserves_unmasked_bits() {
    let mut fake = FakeI2cRegs::new(ADDR);
    fake.regs[0x09] = 0b1111_0000;
    let mut rm = I2cRegmap::new(fake, ADDR);
    block_on(rm.update_bits(0x09, 0b0011_1100, 0b0000_0100)).unwrap();
    assert_eq!(rm.release().regs[0x09], 0b1100_0100);
}

#[test]
fn oversized_bulk_write_is_refused_before_the_bus() {
    let mut rm = I2cRegmap::new(FakeI2cRegs::new(ADDR), ADDR);
    let data = [0u8; MAX_BULK_WRITE + 1];
    assert_eq!(block_on(rm.bulk_write(0x00, &data)), Err(Error::Overflow));
    assert_eq!(rm.release().transactions, 0);
}

#[test]
fn bus_errors_are_wrapped() {
    let mut fake = FakeI2cRegs::new(ADDR);
    fake.fail = true;
    let mut rm = I2cRegmap::new(fake, ADDR);
    assert!(matches!(block_on(rm.read(0x00)), Err(Error::I2c(_))));
    assert!(matches!(block_on(rm.write(0x00, 1)), Err(Error::I2c(_))));
}

#[test]
fn wrong_address_is_a_bus_error() {
    let mut rm = I2cRegmap::new(FakeI2cRegs::new(ADDR), 0x10);
    assert_eq!(rm.address(), 0x10);
    assert!(block_on(rm.read(0x00)).is_err());
}

#[test]
fn stuck_bus_times_out() {
    let mut rm = I2cRegmap::new(StuckI2c::default(), ADDR);
    assert_eq!(block_on(rm.read(0x06)), Err(Error::Timeout));
    assert_eq!(block_on(rm.write(0x06, 0x01)), Err(Error::Timeout));
    assert_eq!(block_on(rm.bulk_read(0x10, &mut [0u8; 4])), Err(Error::Timeout));
    assert_eq!(rm.release().transactions, 3);
}
