use csv_streamy::{CsvStreamError, parse_size};

const KI: u128 = 1024;

#[test]
fn plain_numbers_are_byte_counts() -> anyhow::Result<()> {
    assert_eq!(parse_size("39")?, 39);
    assert_eq!(parse_size("0")?, 0);
    Ok(())
}

#[test]
fn fractions_round_up() -> anyhow::Result<()> {
    assert_eq!(parse_size("39.1")?, 40);
    assert_eq!(parse_size("39.0")?, 39);
    assert_eq!(parse_size("1.5K")?, 2 * KI);
    assert_eq!(parse_size(".5M")?, KI.pow(2));
    Ok(())
}

#[test]
fn every_suffix_scales_by_1024() -> anyhow::Result<()> {
    assert_eq!(parse_size("3K")?, 3 * KI);
    assert_eq!(parse_size("5M")?, 5 * KI.pow(2));
    assert_eq!(parse_size("12G")?, 12 * KI.pow(3));
    assert_eq!(parse_size("1T")?, KI.pow(4));
    assert_eq!(parse_size("20P")?, 20 * KI.pow(5));
    assert_eq!(parse_size("7E")?, 7 * KI.pow(6));
    assert_eq!(parse_size("99Z")?, 99 * KI.pow(7));
    assert_eq!(parse_size("8Y")?, 8 * KI.pow(8));
    Ok(())
}

#[test]
fn garbage_is_not_a_number() {
    for input in ["stuff1234", "stuff1234K", "", "K", "3k", "3KB", "-1", "1.2.3", "1 K"] {
        assert!(
            matches!(parse_size(input), Err(CsvStreamError::NotANumber(ref s)) if s == input),
            "{input:?} should be rejected"
        );
    }
}

#[test]
fn surrounding_whitespace_is_ignored() -> anyhow::Result<()> {
    assert_eq!(parse_size(" 5M ")?, 5 * KI.pow(2));
    assert_eq!(parse_size("\t39\n")?, 39);
    Ok(())
}

#[test]
fn only_plain_decimal_notation_is_accepted() {
    for input in ["1e3", "1E3", "0x10", "+5", "Infinity"] {
        assert!(
            matches!(parse_size(input), Err(CsvStreamError::NotANumber(_))),
            "{input:?} should be rejected"
        );
    }
}
