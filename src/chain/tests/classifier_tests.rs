//! Tests for field pair classification.

use rstest::rstest;

use super::fixtures::{PRIVATE, V1, V2, field_id, people_chain};
use crate::chain::{
    Chain, ConvertKind, FieldId, MessageId, Propagation, TypeRef, domain::model::Field,
    services::classify_pair,
};
use crate::descriptor::{FieldKind, ScalarKind, ValidateDirectives};

fn node(kind: FieldKind, repeated: bool, type_ref: Option<TypeRef>) -> Field {
    Field {
        id: FieldId::new(0),
        message: MessageId::new(0),
        name: "value".to_owned(),
        number: 1,
        kind,
        repeated,
        type_ref,
        oneof: None,
        deprecated: false,
        delegate: None,
        validate: ValidateDirectives::default(),
        receive_required: false,
        next: None,
        private: None,
        propagation: Propagation::default(),
    }
}

fn string() -> FieldKind {
    FieldKind::Scalar(ScalarKind::String)
}

fn external(name: &str) -> Option<TypeRef> {
    Some(TypeRef::External(name.to_owned()))
}

#[rstest]
#[case::same_scalar(node(string(), false, None), node(string(), false, None), Propagation::Copy)]
#[case::different_scalar(
    node(string(), false, None),
    node(FieldKind::Scalar(ScalarKind::Int64), false, None),
    Propagation::Unconvertible
)]
#[case::repeated_mismatch(node(string(), true, None), node(string(), false, None), Propagation::Unconvertible)]
#[case::enums(
    node(FieldKind::Enum, false, None),
    node(FieldKind::Enum, false, None),
    Propagation::Convert(ConvertKind::Enum)
)]
#[case::chain_messages(
    node(FieldKind::Message, false, Some(TypeRef::Message(MessageId::new(1)))),
    node(FieldKind::Message, false, Some(TypeRef::Message(MessageId::new(2)))),
    Propagation::Convert(ConvertKind::Message)
)]
#[case::shared_external(
    node(FieldKind::Message, false, external("google.protobuf.Timestamp")),
    node(FieldKind::Message, false, external("google.protobuf.Timestamp")),
    Propagation::Shared
)]
#[case::different_external(
    node(FieldKind::Message, false, external("google.protobuf.Timestamp")),
    node(FieldKind::Message, false, external("google.protobuf.Duration")),
    Propagation::Unconvertible
)]
fn classify_pair_matches_only_identical_scalars(
    #[case] source: Field,
    #[case] target: Field,
    #[case] expected: Propagation,
) {
    assert_eq!(classify_pair(&source, &target), expected);
}

#[rstest]
fn classification_is_stored_against_the_hop_counterpart(people_chain: Chain) {
    let id = field_id(&people_chain, V1, "Person", "id");
    let employment = field_id(&people_chain, V1, "Person", "employment");
    let person = field_id(&people_chain, V2, "GetResponse", "person");
    let private_id = field_id(&people_chain, PRIVATE, "Person", "id");

    assert!(people_chain.field(id).is_match());
    assert_eq!(
        people_chain.field(employment).propagation,
        Propagation::Convert(ConvertKind::Enum)
    );
    assert_eq!(
        people_chain.field(person).propagation,
        Propagation::Convert(ConvertKind::Message)
    );
    assert_eq!(
        people_chain.field(private_id).propagation,
        Propagation::Unconvertible
    );
}
