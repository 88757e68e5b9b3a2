pub mod char_info;
pub mod comparison;
pub mod fingerprint;
pub mod grid;
pub mod ports;
pub mod string_diff;
