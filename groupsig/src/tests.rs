use crate::{
    claim, claim_verify, crl::Crl, error::GroupsigError, gml::Gml, join_manager,
    join_member_finish, join_member_start, keys::GroupKey, lifecycle::{Context, SetupConfig},
    open, prove_equality, prove_equality_verify, reveal, reveal_into, scheme::{
        RevocationPolicy, SchemeId,
    },
    sign, signature::Signature, trace, verify, CrlEntry, MemberKey,
};
use std::io::BufReader;

fn kty04_config() -> SetupConfig {
    SetupConfig::Kty04(kty04::SetupConfig::new(64, 10))
}

fn join(
    group: &GroupKey,
    manager: &crate::ManagerKey,
    gml: &mut Gml,
    ctx: &mut Context,
) -> MemberKey {
    let (pending, request) = join_member_start(group, ctx).unwrap();
    let response = join_manager(group, manager, gml, &request, ctx).unwrap();
    join_member_finish(group, pending, &response).unwrap()
}

#[test]
fn kty04_end_to_end() {
    let mut ctx = Context::from_seed(100);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);

    let member = join(&group, &manager, &mut gml, &mut ctx);
    assert_eq!(gml.len(), 1);
    assert_eq!(gml.get(0).unwrap().unwrap().id(), 0);

    let signature = sign(b"hello", &member, &group, &mut ctx).unwrap();
    assert!(verify(&signature, b"hello", &group).unwrap());
    assert!(!verify(&signature, b"goodbye", &group).unwrap());

    assert_eq!(open(&signature, &group, &manager, &gml).unwrap(), Some(0));

    let mut crl = Crl::new(SchemeId::Kty04).unwrap();
    let trapdoor = reveal_into(&gml, 0, &mut crl).unwrap();
    assert_eq!(reveal(&gml, 0).unwrap(), trapdoor);
    assert_eq!(crl.len(), 1);
    assert!(trace(&signature, &group, &crl).unwrap());

    // A second member whose trapdoor was never revealed does not trace.
    let other = join(&group, &manager, &mut gml, &mut ctx);
    let other_signature = sign(b"hello", &other, &group, &mut ctx).unwrap();
    assert!(verify(&other_signature, b"hello", &group).unwrap());
    assert!(!trace(&other_signature, &group, &crl).unwrap());
    assert_eq!(
        open(&other_signature, &group, &manager, &gml).unwrap(),
        Some(1)
    );
}

#[test]
fn kty04_claim_and_equality() {
    let mut ctx = Context::from_seed(101);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);
    let member = join(&group, &manager, &mut gml, &mut ctx);

    let s1 = sign(b"first", &member, &group, &mut ctx).unwrap();
    let s2 = sign(b"second", &member, &group, &mut ctx).unwrap();

    let proof = claim(&s1, &member, &group, b"mine", &mut ctx).unwrap();
    assert!(claim_verify(&proof, &s1, &group, b"mine").unwrap());
    assert!(!claim_verify(&proof, &s1, &group, b"not mine").unwrap());

    let signatures = vec![s1, s2];
    let proof =
        prove_equality(&member, &group, &signatures, b"same key", &mut ctx).unwrap();
    assert!(prove_equality_verify(&proof, &signatures, &group, b"same key").unwrap());

    // Against a different member's signature the statement is false.
    let other = join(&group, &manager, &mut gml, &mut ctx);
    let foreign = sign(b"foreign", &other, &group, &mut ctx).unwrap();
    let mixed = vec![signatures[0].clone(), foreign];
    let proof = prove_equality(&member, &group, &mixed, b"both", &mut ctx).unwrap();
    assert!(!prove_equality_verify(&proof, &mixed, &group, b"both").unwrap());
}

#[test]
fn bbs04_end_to_end() {
    let mut ctx = Context::from_seed(102);
    let (group, manager, mut gml) = crate::setup(&SetupConfig::Bbs04, &mut ctx).unwrap();
    assert_eq!(gml.scheme(), SchemeId::Bbs04);

    let member = join(&group, &manager, &mut gml, &mut ctx);
    let signature = sign(b"pairing", &member, &group, &mut ctx).unwrap();
    assert!(verify(&signature, b"pairing", &group).unwrap());
    assert!(!verify(&signature, b"tampered", &group).unwrap());
    assert_eq!(open(&signature, &group, &manager, &gml).unwrap(), Some(0));

    // No tracing surface for this scheme.
    assert!(matches!(
        reveal(&gml, 0),
        Err(GroupsigError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        Crl::new(SchemeId::Bbs04),
        Err(GroupsigError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        claim(&signature, &member, &group, b"m", &mut ctx),
        Err(GroupsigError::UnsupportedOperation { .. })
    ));
}

#[test]
fn mixed_scheme_arguments_are_rejected() {
    let mut ctx = Context::from_seed(103);
    let (kty_group, kty_manager, mut kty_gml) = setup_kty04(&mut ctx);
    let (bbs_group, _, mut bbs_gml) = crate::setup(&SetupConfig::Bbs04, &mut ctx).unwrap();

    let member = join(&kty_group, &kty_manager, &mut kty_gml, &mut ctx);
    assert!(matches!(
        sign(b"m", &member, &bbs_group, &mut ctx),
        Err(GroupsigError::SchemeMismatch { .. })
    ));

    let entry = kty_gml.get(0).unwrap().unwrap();
    assert!(matches!(
        bbs_gml.insert(entry),
        Err(GroupsigError::SchemeMismatch { .. })
    ));

    let signature = sign(b"m", &member, &kty_group, &mut ctx).unwrap();
    assert!(matches!(
        verify(&signature, b"m", &bbs_group),
        Err(GroupsigError::SchemeMismatch { .. })
    ));
}

#[test]
fn signature_bytes_carry_the_scheme_code() {
    let mut ctx = Context::from_seed(104);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);
    let member = join(&group, &manager, &mut gml, &mut ctx);
    let signature = sign(b"wire", &member, &group, &mut ctx).unwrap();

    let bytes = signature.to_bytes().unwrap();
    assert_eq!(bytes[0], SchemeId::Kty04.code());
    let decoded = Signature::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, signature);
    assert!(verify(&decoded, b"wire", &group).unwrap());

    let mut unknown = bytes.clone();
    unknown[0] = 200;
    assert!(matches!(
        Signature::from_bytes(&unknown),
        Err(GroupsigError::UnknownSchemeCode(200))
    ));
}

#[test]
fn group_key_bytes_round_trip() {
    let mut ctx = Context::from_seed(105);
    let (kty_group, _, _) = setup_kty04(&mut ctx);
    let bytes = kty_group.to_bytes().unwrap();
    assert_eq!(GroupKey::from_bytes(&bytes).unwrap(), kty_group);

    let (bbs_group, _, _) = crate::setup(&SetupConfig::Bbs04, &mut ctx).unwrap();
    let bytes = bbs_group.to_bytes().unwrap();
    assert_eq!(GroupKey::from_bytes(&bytes).unwrap(), bbs_group);
}

#[test]
fn gml_round_trips_preserve_vacancies() {
    let mut ctx = Context::from_seed(106);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);
    join(&group, &manager, &mut gml, &mut ctx);
    join(&group, &manager, &mut gml, &mut ctx);
    join(&group, &manager, &mut gml, &mut ctx);

    gml.remove(1).unwrap();
    assert_eq!(gml.len(), 2);
    assert_eq!(gml.storage_len(), 3);
    assert_eq!(gml.get(1).unwrap(), None);

    let bytes = gml.to_bytes().unwrap();
    let imported = Gml::from_bytes(&bytes).unwrap();
    assert_eq!(imported, gml);
    assert_eq!(imported.vacant_index(), 1);

    // The next join fills the vacancy and takes over its identity.
    let mut gml = imported;
    let _ = join(&group, &manager, &mut gml, &mut ctx);
    assert_eq!(gml.storage_len(), 3);
    assert_eq!(gml.get(1).unwrap().unwrap().id(), 1);
}

#[test]
fn gml_text_round_trip() {
    let mut ctx = Context::from_seed(107);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);
    join(&group, &manager, &mut gml, &mut ctx);
    join(&group, &manager, &mut gml, &mut ctx);

    let mut text = vec![];
    gml.write_text(&mut text).unwrap();
    assert_eq!(text.iter().filter(|&&b| b == b'\n').count(), 2);

    let imported = Gml::read_text(SchemeId::Kty04, BufReader::new(&text[..])).unwrap();
    assert_eq!(imported, gml);
}

#[test]
fn crl_round_trips_and_rejects_malformed_lines() {
    let mut ctx = Context::from_seed(108);
    let (group, manager, mut gml) = setup_kty04(&mut ctx);
    let member = join(&group, &manager, &mut gml, &mut ctx);
    let signature = sign(b"revoked", &member, &group, &mut ctx).unwrap();

    let mut crl = Crl::new(SchemeId::Kty04).unwrap();
    reveal_into(&gml, 0, &mut crl).unwrap();

    let bytes = crl.to_bytes().unwrap();
    let imported = Crl::from_bytes(&bytes).unwrap();
    assert_eq!(imported, crl);
    assert!(trace(&signature, &group, &imported).unwrap());

    let mut text = vec![];
    crl.write_text(&mut text).unwrap();
    let imported = Crl::read_text(SchemeId::Kty04, BufReader::new(&text[..])).unwrap();
    assert_eq!(imported.len(), crl.len());
    assert!(trace(&signature, &group, &imported).unwrap());

    // One extra field on a record aborts the whole import.
    let mut broken = text.clone();
    broken.extend_from_slice(b"1\tff\tff\n");
    assert!(matches!(
        Crl::read_text(SchemeId::Kty04, BufReader::new(&broken[..])),
        Err(GroupsigError::MalformedRecord { line: 2 })
    ));

    // So does an unparsable trapdoor.
    let mut broken = text.clone();
    broken.extend_from_slice(b"1\tzz\n");
    assert!(matches!(
        Crl::read_text(SchemeId::Kty04, BufReader::new(&broken[..])),
        Err(GroupsigError::MalformedRecord { line: 2 })
    ));
}

#[test]
fn crl_insert_honors_the_dedup_policy() {
    let entry = CrlEntry::Kty04(kty04::CrlEntry {
        id: 0,
        trapdoor: rug::Integer::from(41),
    });

    // KTY04's default keeps duplicates.
    let mut crl = Crl::new(SchemeId::Kty04).unwrap();
    assert_eq!(crl.policy(), RevocationPolicy::AllowDuplicates);
    assert_eq!(crl.insert(entry.clone()).unwrap(), 0);
    assert_eq!(crl.insert(entry.clone()).unwrap(), 1);
    assert_eq!(crl.len(), 2);

    // The sibling policy scans first and returns the existing slot.
    let mut crl = Crl::with_policy(SchemeId::Kty04, RevocationPolicy::DedupByTrapdoor).unwrap();
    assert_eq!(crl.insert(entry.clone()).unwrap(), 0);
    assert_eq!(crl.insert(entry.clone()).unwrap(), 0);
    assert_eq!(crl.len(), 1);
    assert!(crl.exists(&entry).unwrap());

    let absent = CrlEntry::Kty04(kty04::CrlEntry {
        id: 1,
        trapdoor: rug::Integer::from(43),
    });
    assert!(!crl.exists(&absent).unwrap());
}

fn setup_kty04(ctx: &mut Context) -> (GroupKey, crate::ManagerKey, Gml) {
    crate::setup(&kty04_config(), ctx).unwrap()
}
