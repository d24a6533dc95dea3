//! Opening, trapdoor reveal and tracing.

use crate::{
    entries::{CrlEntry, GmlEntry},
    error::Kty04Error,
    keys::{GroupKey, ManagerKey},
    sign::{pow, Signature},
};
use groupsig_utils::Ledger;
use rug::Integer;

/// Recovers the signer's certificate as `T1·(T2^x)^{−1}` and scans the
/// membership list for it. First match wins; `Ok(None)` when no live entry
/// matches.
pub fn open(
    group: &GroupKey,
    manager: &ManagerKey,
    gml: &Ledger<GmlEntry>,
    signature: &Signature,
) -> Result<Option<u64>, Kty04Error> {
    let n = &group.modulus;
    let shadow = pow(&signature.t2, &manager.x, n)?
        .invert(n)
        .map_err(|_| Kty04Error::NonInvertibleExponent)?;
    let certificate = Integer::from(&signature.t1 * &shadow) % n;

    for (_, entry) in gml.iter_live() {
        if entry.certificate == certificate {
            return Ok(Some(entry.id));
        }
    }
    Ok(None)
}

/// Reads the tracing trapdoor escrowed at `index`. A vacated slot is an
/// invalid argument, not a protocol failure.
pub fn reveal(gml: &Ledger<GmlEntry>, index: usize) -> Result<Integer, Kty04Error> {
    match gml.get(index)? {
        Some(entry) => Ok(entry.trapdoor.clone()),
        None => Err(Kty04Error::VacantSlot(index)),
    }
}

/// Whether `trapdoor` links this signature: `T5^{x′} = T4`.
pub fn trapdoor_matches(
    group: &GroupKey,
    signature: &Signature,
    trapdoor: &Integer,
) -> Result<bool, Kty04Error> {
    Ok(pow(&signature.t5, trapdoor, &group.modulus)? == signature.t4)
}

/// Scans the revocation list for a trapdoor linking this signature, stopping
/// at the first match.
pub fn trace(
    group: &GroupKey,
    crl: &Ledger<CrlEntry>,
    signature: &Signature,
) -> Result<bool, Kty04Error> {
    for (_, entry) in crl.iter_live() {
        if trapdoor_matches(group, signature, &entry.trapdoor)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::{sign, tests::test_group};
    use blake2::Blake2b512;

    #[test]
    fn open_recovers_the_signer() {
        let (group, manager, member, entry, mut rng) = test_group(30);
        let mut gml = Ledger::new();
        gml.insert(entry);

        let signature = sign::<Blake2b512, _>(&mut rng, &group, &member, b"open me").unwrap();
        assert_eq!(open(&group, &manager, &gml, &signature).unwrap(), Some(0));
    }

    #[test]
    fn open_without_a_matching_entry_fails_cleanly() {
        let (group, manager, member, _, mut rng) = test_group(31);
        let gml = Ledger::new();
        let signature = sign::<Blake2b512, _>(&mut rng, &group, &member, b"nobody").unwrap();
        assert_eq!(open(&group, &manager, &gml, &signature).unwrap(), None);
    }

    #[test]
    fn reveal_reads_the_escrowed_trapdoor() {
        let (_, _, member, entry, _) = test_group(32);
        let mut gml = Ledger::new();
        gml.insert(entry);

        assert_eq!(reveal(&gml, 0).unwrap(), member.tracing_exponent);
        assert!(matches!(reveal(&gml, 3), Err(Kty04Error::Ledger(_))));

        gml.remove(0).unwrap();
        assert_eq!(reveal(&gml, 0).unwrap_err(), Kty04Error::VacantSlot(0));
    }

    #[test]
    fn trace_links_revoked_members_only() {
        let (group, _, member, entry, mut rng) = test_group(33);
        let signature = sign::<Blake2b512, _>(&mut rng, &group, &member, b"trace").unwrap();

        let mut crl = Ledger::new();
        assert!(!trace(&group, &crl, &signature).unwrap());

        crl.insert(CrlEntry {
            id: entry.id,
            trapdoor: entry.trapdoor.clone(),
        });
        assert!(trace(&group, &crl, &signature).unwrap());

        // A different trapdoor does not link.
        let mut other_crl = Ledger::new();
        other_crl.insert(CrlEntry {
            id: 9,
            trapdoor: entry.trapdoor + 1u32,
        });
        assert!(!trace(&group, &other_crl, &signature).unwrap());
    }
}
