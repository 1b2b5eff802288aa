//! Proptest generators for property-based testing.

use proptest::prelude::*;

use rite_ledger_core::{
    AuthorityLevel, DispatchDraft, DispatchId, DispatchRecord, RealmId, Seal,
};

/// Generate a valid realm id.
pub fn realm_id() -> impl Strategy<Value = RealmId> {
    "[A-Z]{2}-[0-9]{3}".prop_map(|s| RealmId::parse(&s).unwrap())
}

/// Generate a valid dispatch id under the standard prefix.
pub fn dispatch_id() -> impl Strategy<Value = DispatchId> {
    (2000u32..=2099, 1u32..=12, 1u32..=28, "[0-9A-F]{8}").prop_map(|(y, m, d, hex)| {
        DispatchId::parse(&format!("DSP-{y:04}-{m:02}-{d:02}-{hex}")).unwrap()
    })
}

/// Generate a Seal.
pub fn seal() -> impl Strategy<Value = Seal> {
    prop_oneof![
        Just(Seal::Temporal),
        Just(Seal::Sacred),
        Just(Seal::Immutable),
        Just(Seal::Eternal),
    ]
}

/// Generate an AuthorityLevel.
pub fn authority_level() -> impl Strategy<Value = AuthorityLevel> {
    prop_oneof![
        Just(AuthorityLevel::Initiate),
        Just(AuthorityLevel::Keeper),
        Just(AuthorityLevel::Warden),
        Just(AuthorityLevel::Sovereign),
    ]
}

/// Generate an actor name.
pub fn actor() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,15}".prop_map(String::from)
}

/// Generate a capsule id.
pub fn capsule() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,11}( [A-Z][a-z]{2,11})?".prop_map(String::from)
}

/// Generate a dotted intent name.
pub fn intent() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,11}\\.[A-Z][a-z]{2,11}".prop_map(String::from)
}

/// Generate input bytes of specified max length.
pub fn input(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a second-precision timestamp up to the year 2100.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Parameters for generating a sealed dispatch record.
#[derive(Debug, Clone)]
pub struct DispatchParams {
    pub actor: String,
    pub realm: RealmId,
    pub capsule: String,
    pub intent: String,
    pub input: Vec<u8>,
    pub seal: Seal,
    pub timestamp: i64,
}

impl Arbitrary for DispatchParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            actor(),
            realm_id(),
            capsule(),
            intent(),
            input(256),
            seal(),
            timestamp(),
        )
            .prop_map(
                |(actor, realm, capsule, intent, input, seal, timestamp)| DispatchParams {
                    actor,
                    realm,
                    capsule,
                    intent,
                    input,
                    seal,
                    timestamp,
                },
            )
            .boxed()
    }
}

/// Seal a record from generated parameters under the given id.
pub fn record_from_params(params: &DispatchParams, id: DispatchId) -> DispatchRecord {
    DispatchDraft::new(
        params.actor.clone(),
        params.realm.clone(),
        params.capsule.clone(),
        params.intent.clone(),
        params.seal,
    )
    .input(params.input.clone())
    .seal_record(id, params.timestamp)
}
