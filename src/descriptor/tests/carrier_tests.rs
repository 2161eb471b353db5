//! Tests for the comment and option annotation carriers.

use rstest::rstest;
use serde_json::json;

use crate::descriptor::{
    AnnotationError, AnnotationSource, Carrier, CommentAnnotations, EntityKind,
    OptionAnnotations, ReceiveDirectives, ValidateDirectives, domain::OptionMap,
};

fn options(key: &str, value: serde_json::Value) -> Carrier {
    let mut map = OptionMap::new();
    map.insert(key.to_owned(), value);
    Carrier::from_options(map)
}

// ============================================================================
// Comment carrier
// ============================================================================

#[rstest]
#[case("gen:svc delegate name=FullName", Some("FullName"))]
#[case("Some prose.\ngen:svc delegate name=full_name", Some("full_name"))]
#[case("gen:svcdelegate name=Ignored", None)]
#[case("no directives here", None)]
fn comment_delegate_names(#[case] comment: &str, #[case] expected: Option<&str>) {
    let carrier = Carrier::from_comment(comment);

    let name = CommentAnnotations
        .delegate_name(EntityKind::Field, &carrier)
        .expect("delegate parses");

    assert_eq!(name.as_deref(), expected);
}

#[rstest]
fn comment_delegate_rejects_other_keys() {
    let carrier = Carrier::from_comment("gen:svc delegate target=Other");

    let result = CommentAnnotations.delegate_name(EntityKind::Message, &carrier);

    assert_eq!(
        result,
        Err(AnnotationError::InvalidDelegateKey("target".to_owned()))
    );
}

#[rstest]
fn comment_tokens_must_be_key_value_pairs() {
    let carrier = Carrier::from_comment("gen:svc validate required");

    let result = CommentAnnotations.validate_directives(EntityKind::Field, &carrier);

    assert_eq!(result, Err(AnnotationError::malformed("validate", "required")));
}

#[rstest]
#[case::misspelt_key("gen:svc validate mni=3", "validate", "mni=3")]
#[case::non_boolean_required("gen:svc validate required=yes", "validate", "required=yes")]
#[case::unknown_receive_key("gen:svc receive names=A", "receive", "names=A")]
#[case::non_boolean_receive("gen:svc receive required=1", "receive", "required=1")]
fn comment_directives_reject_unknown_keys_and_flags(
    #[case] comment: &str,
    #[case] verb: &str,
    #[case] token: &str,
) {
    let carrier = Carrier::from_comment(comment);

    let result = if verb == "validate" {
        CommentAnnotations
            .validate_directives(EntityKind::Field, &carrier)
            .map(|_| ())
    } else {
        CommentAnnotations
            .receive_directives(EntityKind::Field, &carrier)
            .map(|_| ())
    };

    assert_eq!(result, Err(AnnotationError::malformed(verb, token)));
}

#[rstest]
fn comment_validate_directives_accumulate() {
    let carrier = Carrier::from_comment(
        "gen:svc validate required=true min=2\ngen:svc validate max=64 in=a,b is=uuid",
    );

    let directives = CommentAnnotations
        .validate_directives(EntityKind::Field, &carrier)
        .expect("directives parse");

    assert_eq!(
        directives,
        ValidateDirectives {
            required: true,
            min: Some("2".to_owned()),
            max: Some("64".to_owned()),
            members: Some(vec!["a".to_owned(), "b".to_owned()]),
            format: Some("uuid".to_owned()),
        }
    );
    assert!(directives.is_declared());
}

#[rstest]
fn comment_receive_directives_collect_names() {
    let carrier =
        Carrier::from_comment("gen:svc receive name=PART_TIME name=CONTRACT required=true");

    let directives = CommentAnnotations
        .receive_directives(EntityKind::EnumValue, &carrier)
        .expect("directives parse");

    assert_eq!(
        directives,
        ReceiveDirectives {
            required: true,
            names: vec!["PART_TIME".to_owned(), "CONTRACT".to_owned()],
        }
    );
}

#[rstest]
fn comment_deprecation_is_a_bare_directive() {
    let deprecated = Carrier::from_comment("gen:svc deprecated");
    let plain = Carrier::from_comment("deprecated in prose only");

    assert_eq!(CommentAnnotations.deprecated(EntityKind::Method, &deprecated), Ok(true));
    assert_eq!(CommentAnnotations.deprecated(EntityKind::Method, &plain), Ok(false));
}

// ============================================================================
// Option carrier
// ============================================================================

#[rstest]
fn option_extension_keys_are_per_entity_kind() {
    assert_eq!(
        OptionAnnotations::extension_key(EntityKind::Field),
        "[gen.svc.field]"
    );
    assert_eq!(
        OptionAnnotations::extension_key(EntityKind::EnumValue),
        "[gen.svc.enum_value]"
    );
}

#[rstest]
fn option_payload_is_decoded() {
    let carrier = options(
        "[gen.svc.field]",
        json!({
            "delegate": { "name": "full_name" },
            "deprecated": true,
            "validate": { "required": true, "min": 1, "max": "64", "in": ["a", 2], "is": "email" },
            "receive": { "required": true }
        }),
    );

    let source = OptionAnnotations;
    let kind = EntityKind::Field;

    assert_eq!(
        source.delegate_name(kind, &carrier),
        Ok(Some("full_name".to_owned()))
    );
    assert_eq!(source.deprecated(kind, &carrier), Ok(true));
    assert_eq!(
        source.validate_directives(kind, &carrier),
        Ok(ValidateDirectives {
            required: true,
            min: Some("1".to_owned()),
            max: Some("64".to_owned()),
            members: Some(vec!["a".to_owned(), "2".to_owned()]),
            format: Some("email".to_owned()),
        })
    );
    assert!(source.receive_directives(kind, &carrier).is_ok_and(|found| found.required));
}

#[rstest]
fn option_payload_of_another_kind_is_ignored() {
    let carrier = options("[gen.svc.message]", json!({ "deprecated": true }));

    assert_eq!(OptionAnnotations.deprecated(EntityKind::Field, &carrier), Ok(false));
}

#[rstest]
#[case::top_level(json!({ "deprecate": true }))]
#[case::validate(json!({ "validate": { "mni": 3 } }))]
#[case::receive(json!({ "receive": { "name": "A" } }))]
fn unknown_option_keys_are_reported(#[case] payload: serde_json::Value) {
    let carrier = options("[gen.svc.field]", payload);

    let deprecated = OptionAnnotations.deprecated(EntityKind::Field, &carrier);

    assert!(matches!(
        deprecated,
        Err(AnnotationError::InvalidOption { extension, .. }) if extension == "[gen.svc.field]"
    ));
}

#[rstest]
fn invalid_option_payload_is_reported() {
    let carrier = options("[gen.svc.method]", json!({ "deprecated": "yes" }));

    let result = OptionAnnotations.deprecated(EntityKind::Method, &carrier);

    assert!(matches!(
        result,
        Err(AnnotationError::InvalidOption { extension, .. }) if extension == "[gen.svc.method]"
    ));
}
