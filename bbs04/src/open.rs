//! Opening: decrypt the certificate out of a signature and look it up.

use crate::{
    error::Bbs04Error,
    join::GmlEntry,
    setup::{GroupKey, ManagerKey},
    sign::Signature,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use groupsig_utils::Ledger;

/// `A = T3 − (T1·ξ1 + T2·ξ2)`, then a linear scan of the membership list.
/// First match wins; `Ok(None)` when no live entry matches.
pub fn open<E: Pairing>(
    _group: &GroupKey<E>,
    manager: &ManagerKey<E>,
    gml: &Ledger<GmlEntry<E>>,
    signature: &Signature<E>,
) -> Result<Option<u64>, Bbs04Error> {
    if !signature.is_non_zero() {
        return Err(Bbs04Error::ZeroSignature);
    }
    let shadow = signature.t1 * manager.opener.xi1 + signature.t2 * manager.opener.xi2;
    let certificate = (signature.t3.into_group() - shadow).into_affine();

    for (_, entry) in gml.iter_live() {
        if entry.certificate == certificate {
            return Ok(Some(entry.id));
        }
    }
    Ok(None)
}
