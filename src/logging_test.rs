use super::*;

#[test]
fn filter_falls_back_to_info() {
    assert_eq!(filter("").to_string(), DEFAULT_FILTER);
    assert_eq!(filter("kt_toggle=loudest").to_string(), DEFAULT_FILTER);
}

#[test]
fn filter_uses_valid_directives() {
    assert_eq!(filter("kt_toggle=debug").to_string(), "kt_toggle=debug");
}

#[test]
fn init_twice_does_not_panic() {
    init();
    init();
}
