//! Tests for descriptor type labels.

use rstest::rstest;

use crate::descriptor::{FieldKind, ScalarKind};

#[rstest]
#[case("TYPE_STRING", Some(FieldKind::Scalar(ScalarKind::String)))]
#[case("TYPE_SINT64", Some(FieldKind::Scalar(ScalarKind::Sint64)))]
#[case("TYPE_MESSAGE", Some(FieldKind::Message))]
#[case("TYPE_ENUM", Some(FieldKind::Enum))]
#[case("TYPE_GROUP", None)]
fn type_labels_map_to_kinds(#[case] label: &str, #[case] expected: Option<FieldKind>) {
    assert_eq!(FieldKind::from_type_label(label), expected);
}

#[rstest]
#[case(ScalarKind::Double, true, false)]
#[case(ScalarKind::Fixed32, false, true)]
#[case(ScalarKind::Bool, false, false)]
#[case(ScalarKind::String, false, false)]
fn scalar_kind_classes(#[case] kind: ScalarKind, #[case] float: bool, #[case] integer: bool) {
    assert_eq!(kind.is_float(), float);
    assert_eq!(kind.is_integer(), integer);
    assert_eq!(kind.is_numeric(), float || integer);
}
