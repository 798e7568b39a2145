use rand::{thread_rng, Rng};

/// Shortest vendor code the generator will produce.
pub const MIN_CODE_LENGTH: usize = 4;

/// Upper bound imposed by the `vendors.vendor_code` column.
pub const MAX_CODE_LENGTH: usize = 50;

/// Every character is drawn uniformly from these 36.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random uppercase alphanumeric vendor code.
///
/// `len` is clamped into `MIN_CODE_LENGTH..=MAX_CODE_LENGTH`. Uniqueness is
/// enforced by the database, not here.
pub fn generate_vendor_code(len: usize) -> String {
    let len = len.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH);
    let mut rng = thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
