use dspsim::format::fmt_decoded;
use dspsim::{Decoded, Decoder, LineDecoder, Operand, SimError};
use pretty_assertions::assert_eq;

fn decode(line: &str) -> Option<Decoded> {
    LineDecoder::default().decode(line).unwrap()
}

#[test]
fn splits_mnemonic_and_operands() {
    let d = decode("  ADD  #1Fh , 16,A  ").unwrap();
    assert_eq!(d.mnemonic, "ADD");
    assert_eq!(
        d.operands,
        vec![
            Operand::Immediate(0x1F),
            Operand::Immediate(16),
            Operand::Register("A".into())
        ]
    );
    assert_eq!(d.label, None);
}

#[test]
fn no_operands() {
    let d = decode("nop").unwrap();
    assert_eq!(d.mnemonic, "nop");
    assert!(d.operands.is_empty());
    assert_eq!(fmt_decoded(&d), "NOP");
}

#[test]
fn comments_and_blank_lines() {
    assert_eq!(decode(""), None);
    assert_eq!(decode("\t  "), None);
    assert_eq!(decode("; LD #1, A"), None);
    assert_eq!(decode("done:   ; end"), None);
    let d = decode("LD #1, A;trailing").unwrap();
    assert_eq!(d.operands.len(), 2);
}

#[test]
fn operand_notations() {
    let d = decode("X 5, -3, #0x10, 101b, 12d, _tmp, ar0").unwrap();
    assert_eq!(
        d.operands,
        vec![
            Operand::Immediate(5),
            Operand::Immediate(-3),
            Operand::Immediate(16),
            Operand::Immediate(5),
            Operand::Immediate(12),
            Operand::Register("_tmp".into()),
            Operand::Register("ar0".into()),
        ]
    );
}

#[test]
fn malformed_operands() {
    let dec = LineDecoder::default();
    assert_eq!(
        dec.decode("LD #zz, A").unwrap_err(),
        SimError::OperandParse { token: "zz".into(), reason: "malformed number" }
    );
    assert_eq!(
        dec.decode("LD *AR1, A").unwrap_err(),
        SimError::OperandParse { token: "*AR1".into(), reason: "not a register name or number" }
    );
    assert_eq!(
        dec.decode("LD #1, A,").unwrap_err(),
        SimError::OperandParse { token: "".into(), reason: "empty operand" }
    );
    assert_eq!(
        dec.decode("9x: NOP").unwrap_err(),
        SimError::InvalidLabel { label: "9x".into() }
    );
}

#[test]
fn listing_round_trips_through_decoder() {
    let d = decode("top:  sub  #-2,b").unwrap();
    let listing = fmt_decoded(&d);
    assert_eq!(listing, "top: SUB #-2, b");
    let again = decode(&listing).unwrap();
    assert_eq!(again.operands, d.operands);
    assert_eq!(again.label, d.label);
}

#[test]
fn custom_comment_character() {
    let dec = LineDecoder::new('*').unwrap();
    let d = dec.decode("LD #1, A * load").unwrap().unwrap();
    assert_eq!(d.operands.len(), 2);
    assert_eq!(dec.comment(), '*');
}

#[test]
fn comment_character_must_not_be_grammar() {
    assert_eq!(
        LineDecoder::new('#').unwrap_err(),
        SimError::InvalidComment { comment: '#' }
    );
    assert!(LineDecoder::new(',').is_err());
    assert!(LineDecoder::new('A').is_err());
    assert_eq!(LineDecoder::new('!').unwrap().comment(), '!');
}
