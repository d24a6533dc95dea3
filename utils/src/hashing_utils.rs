//! Challenge derivation for Fiat–Shamir style protocols whose transcript is
//! a sequence of big integers.

use crate::encoding::integer_to_bytes;
use digest::Digest;
use rug::{integer::Order, Integer};

/// Hashes `message` followed by every transcript element and keeps the low
/// `bits` bits of the digest. Only the retained bits are load-bearing for
/// soundness; the truncation width is the scheme's security parameter.
pub fn truncated_challenge<'a, D: Digest, I>(message: &[u8], transcript: I, bits: u32) -> Integer
where
    I: IntoIterator<Item = &'a Integer>,
{
    let mut hasher = D::new();
    hasher.update(message);
    for element in transcript {
        hasher.update(integer_to_bytes(element));
    }
    let mut challenge = Integer::new();
    challenge.assign_digits(hasher.finalize().as_slice(), Order::MsfBe);
    challenge.keep_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2b512;

    #[test]
    fn challenge_is_truncated() {
        let transcript = [Integer::from(12), Integer::from(345)];
        let c = truncated_challenge::<Blake2b512, _>(b"msg", transcript.iter(), 10);
        assert!(c < (Integer::from(1) << 10u32));
        assert!(c >= 0);
    }

    #[test]
    fn challenge_depends_on_every_part() {
        let transcript = [Integer::from(12), Integer::from(345)];
        let base = truncated_challenge::<Blake2b512, _>(b"msg", transcript.iter(), 64);

        let other_msg = truncated_challenge::<Blake2b512, _>(b"msh", transcript.iter(), 64);
        assert_ne!(base, other_msg);

        let other_transcript = [Integer::from(13), Integer::from(345)];
        let other = truncated_challenge::<Blake2b512, _>(b"msg", other_transcript.iter(), 64);
        assert_ne!(base, other);
    }
}
