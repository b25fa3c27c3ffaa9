//! Merchant references for new payment attempts.

use rand::Rng;
use time::OffsetDateTime;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// `order_{unix_millis}_{9 base-36 chars}`.
pub fn merchant_reference<R: Rng + ?Sized>(now: OffsetDateTime, rng: &mut R) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    format!("order_{millis}_{suffix}")
}

pub fn new_merchant_reference() -> String {
    merchant_reference(OffsetDateTime::now_utc(), &mut rand::rng())
}
