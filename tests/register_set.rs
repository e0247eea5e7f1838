use dspsim::format::fmt_registers;
use dspsim::{Access, Base, Register, RegisterSet, SimError};
use pretty_assertions::assert_eq;

fn r(name: &str, short: &str) -> Register {
    Register::new(name, short, 16, 16).unwrap()
}

#[test]
fn keeps_insertion_order() {
    let mut set = RegisterSet::new();
    assert!(set.is_empty());
    for (n, s) in [("Temp", "T"), ("Acc", "A"), ("Aux", "AR0")] {
        set.add(r(n, s)).unwrap();
    }
    let order: Vec<&str> = set.iter().map(Register::short_name).collect();
    assert_eq!(order, vec!["T", "A", "AR0"]);
    assert_eq!(set.len(), 3);
}

#[test]
fn names_and_short_names_are_unique() {
    let mut set = RegisterSet::new();
    set.add(r("Accumulator A", "A")).unwrap();
    assert_eq!(
        set.add(r("Another", "a")).unwrap_err(),
        SimError::DuplicateRegister { name: "a".into() }
    );
    assert!(set.add(r("A", "X")).is_err());
    assert_eq!(set.len(), 1);
}

#[test]
fn access_flags_guard_instruction_paths() {
    let mut set = RegisterSet::new();
    set.add(r("Read only", "RO").with_access(Access::READ)).unwrap();
    set.add(r("Write only", "WO").with_access(Access::WRITE)).unwrap();

    assert_eq!(
        set.store("RO", 1, 0).unwrap_err(),
        SimError::AccessDenied { register: "Read only".into(), access: Access::WRITE }
    );
    assert_eq!(
        set.fetch("WO", 0).unwrap_err(),
        SimError::AccessDenied { register: "Write only".into(), access: Access::READ }
    );
    set.store("WO", 7, 0).unwrap();
    assert_eq!(set.get("WO").unwrap().value(), 7);
    assert_eq!(set.fetch("RO", 0).unwrap(), 0);
}

#[test]
fn unknown_register() {
    let set = RegisterSet::new();
    assert_eq!(
        set.fetch("AR9", 0).unwrap_err(),
        SimError::UnknownRegister { name: "AR9".into() }
    );
}

#[test]
fn reset_and_snapshot() {
    let mut set = RegisterSet::new();
    set.add(r("Temp", "T")).unwrap();
    set.store("T", 0x42, 0).unwrap();
    let snap = set.snapshot();
    assert_eq!(snap[0].value, 0x42);
    assert_eq!(snap[0].short_name, "T");
    set.reset();
    assert_eq!(set.get("t").unwrap().value(), 0);
}

#[test]
fn dump_aligns_short_names() {
    let mut set = RegisterSet::new();
    set.add(r("Temp", "T")).unwrap();
    set.add(r("Aux 0", "AR0")).unwrap();
    set.store("AR0", 0x1F, 0).unwrap();
    assert_eq!(fmt_registers(&set, Base::Hex), "T   00h\nAR0 1fh");
}
