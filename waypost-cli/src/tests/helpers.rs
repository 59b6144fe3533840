//! Fixtures shared by the CLI unit and behaviour tests.

use waypost_core::Coordinates;
use waypost_core::test_support::StubGeocoder;

pub(super) const SE: &str = "-23.5505,-46.6333";
pub(super) const PAULISTA: &str = "-23.5631,-46.6542";
pub(super) const SE_ADDRESS: &str = "Praça da Sé, São Paulo";

pub(super) fn se() -> Coordinates {
    Coordinates::from_degrees(-23.5505, -46.6333).expect("valid coordinates")
}

pub(super) fn paulista() -> Coordinates {
    Coordinates::from_degrees(-23.5631, -46.6542).expect("valid coordinates")
}

pub(super) fn geocoder() -> StubGeocoder {
    StubGeocoder::with_entries([(SE_ADDRESS, se())])
}

pub(super) fn output_lines(buffer: &[u8]) -> Vec<String> {
    String::from_utf8(buffer.to_vec())
        .expect("stdout utf-8")
        .lines()
        .map(str::to_owned)
        .collect()
}
