use dspsim::register::format_value;
use dspsim::{Base, OverflowPolicy, Register, SimError};
use pretty_assertions::assert_eq;

fn reg(bits: u32, bus: u32) -> Register {
    Register::new("R", "R", bits, bus).unwrap()
}

#[test]
fn write_then_read_truncates_to_bus() {
    let mut r = reg(16, 8);
    for x in [0i64, 1, 0x7F, 0xFF, 0x100, 0x1234, -1, i64::MAX, i64::MIN] {
        r.write(x, 0);
        assert_eq!(r.read(0), x & r.bus_mask(), "input {x:#x}");
    }
}

#[test]
fn shift_laws() {
    assert_eq!(Register::shift(0x01, 4), 0x10);
    assert_eq!(Register::shift(0x10, -4), 0x01);
    for x in [0i64, 1, -1, 0x1234, i64::MAX, i64::MIN] {
        assert_eq!(Register::shift(x, 0), x);
    }
    // right shifts are arithmetic
    assert_eq!(Register::shift(-16, -2), -4);
    // oversized amounts saturate
    assert_eq!(Register::shift(1, 64), 0);
    assert_eq!(Register::shift(1, i32::MAX), 0);
    assert_eq!(Register::shift(5, -100), 0);
    assert_eq!(Register::shift(-5, i32::MIN), -1);
}

#[test]
fn eight_bit_write_drops_the_ninth_bit() {
    let mut r = reg(8, 8);
    r.write(0x1FF, 0);
    assert_eq!(r.value(), 0xFF);
}

#[test]
fn bus_mask_follows_bus_width() {
    let mut acc = Register::new("Accumulator", "ACC", 40, 16).unwrap();
    assert_eq!(acc.bit_mask(), 0xFF_FFFF_FFFF);
    assert_eq!(acc.bus_mask(), 0xFFFF);

    acc.write(0x12345, 0);
    assert_eq!(acc.value(), 0x2345);

    // high word through the 16-bit bus
    acc.write(0x1234, 16);
    assert_eq!(acc.value(), 0x1234_0000);
    assert_eq!(acc.read(-16), 0x1234);
    assert_eq!(acc.read(0), 0);
}

#[test]
fn overflow_policies() {
    let mut wrap = reg(8, 8);
    wrap.write(0xFF, 4);
    assert_eq!(wrap.value(), 0xF0);

    let mut sat = reg(8, 8).with_overflow(OverflowPolicy::Saturate);
    sat.write(0x12, 4);
    assert_eq!(sat.value(), 0xFF);
    sat.write(0x0F, 4);
    assert_eq!(sat.value(), 0xF0);

    let mut rej = reg(8, 8).with_overflow(OverflowPolicy::Reject);
    rej.write(0x55, 0);
    let err = rej.try_write(0xFF, 4).unwrap_err();
    assert_eq!(
        err,
        SimError::RegisterOverflow {
            register: "R".into(),
            value: 0xFF,
            shift: 4
        }
    );
    assert_eq!(rej.value(), 0x55);
    rej.try_write(0x0F, 4).unwrap();
    assert_eq!(rej.value(), 0xF0);
    // plain write never fails
    rej.write(0xFF, 4);
    assert_eq!(rej.value(), 0xF0);
}

#[test]
fn writes_stay_within_register_width() {
    let mut r = reg(12, 12);
    for shift in [1, 4, 11, 12, 40, 63, 64, 200] {
        r.write(0xFFF, shift);
        assert!(r.value() >= 0 && r.value() <= r.bit_mask(), "shift {shift}");
    }
}

#[test]
fn negative_inputs_wrap_to_twos_complement() {
    let mut r = reg(16, 16);
    r.write(-1, 0);
    assert_eq!(r.value(), 0xFFFF);
    assert_eq!(r.signed(), -1);
    r.write(0x7FFF, 0);
    assert_eq!(r.signed(), 0x7FFF);
    r.write(0x8000, 0);
    assert_eq!(r.signed(), -0x8000);
}

#[test]
fn formats_full_width_value() {
    let mut r = reg(40, 40);
    r.write(5, 0);
    assert_eq!(r.format(Base::Decimal), "5d");
    assert_eq!(r.format(Base::Binary), "101b");
    assert_eq!(r.format(Base::Hex), "05h");
    r.write(0x1234, 0);
    assert_eq!(r.format(Base::Hex), "1234h");
    r.write(0x123, 0);
    assert_eq!(r.format(Base::Hex), "0123h");
    r.write(0xAB_CDEF_0123, 0);
    assert_eq!(r.format(Base::Hex), "abcdef0123h");

    let narrow = {
        let mut n = Register::new("N", "N", 24, 8).unwrap();
        n.write(0xFF, 8);
        n
    };
    // display is not truncated to the bus
    assert_eq!(narrow.format(Base::Hex), "ff00h");
}

#[test]
fn format_value_edge_cases() {
    assert_eq!(format_value(0, Base::Decimal), "0d");
    assert_eq!(format_value(0, Base::Hex), "00h");
    assert_eq!(format_value(0, Base::Binary), "0b");
    assert_eq!(format_value(-10, Base::Hex), "-0ah");
    assert_eq!(format_value(i64::MIN, Base::Decimal), "-9223372036854775808d");
}

#[test]
fn rejects_invalid_widths() {
    for (bits, bus) in [(0, 0), (64, 8), (8, 9), (8, 0)] {
        let err = Register::new("X", "X", bits, bus).unwrap_err();
        assert!(matches!(err, SimError::InvalidRegister { .. }), "{bits}/{bus}");
    }
}

#[test]
fn matches_name_or_short_name() {
    let r = Register::new("Auxiliary register 3", "AR3", 16, 16).unwrap();
    assert!(r.matches("ar3"));
    assert!(r.matches("AUXILIARY REGISTER 3"));
    assert!(!r.matches("AR"));
}
