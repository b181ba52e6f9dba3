mod telephony;

pub use telephony::*;
