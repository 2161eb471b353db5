//! Annotation carrier reading `gen:svc` tagged comments.
//!
//! Recognised lines, after trimming:
//!
//! ```text
//! gen:svc delegate name=FullName
//! gen:svc deprecated
//! gen:svc validate required=true min=2 max=64 in=a,b is=uuid
//! gen:svc receive required=true
//! gen:svc receive name=PART_TIME name=FULL_TIME
//! ```

use crate::descriptor::{
    domain::Carrier,
    error::AnnotationError,
    ports::{AnnotationResult, AnnotationSource, EntityKind, ReceiveDirectives, ValidateDirectives},
};

/// Comment tag introducing a directive line.
pub const TAG: &str = "gen:svc";

/// Annotation source backed by tagged comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentAnnotations;

impl CommentAnnotations {
    /// Creates the comment carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Yields the argument text of every `gen:svc <verb>` line.
fn directives<'a>(carrier: &'a Carrier, verb: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    carrier.comments.lines().filter_map(move |line| {
        let rest = line.strip_prefix(TAG)?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let body = rest.trim_start();
        let (head, args) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
        (head == verb).then(|| args.trim())
    })
}

/// Splits directive arguments into `key=value` pairs.
fn pairs<'a>(verb: &str, args: &'a str) -> AnnotationResult<Vec<(&'a str, &'a str)>> {
    args.split_whitespace()
        .map(|token| {
            token
                .split_once('=')
                .ok_or_else(|| AnnotationError::malformed(verb, token))
        })
        .collect()
}

/// Reads a `true`/`false` flag; anything else is malformed.
fn flag(verb: &str, key: &str, value: &str) -> AnnotationResult<bool> {
    value
        .parse()
        .map_err(|_| AnnotationError::malformed(verb, format!("{key}={value}")))
}

impl AnnotationSource for CommentAnnotations {
    fn delegate_name(
        &self,
        _kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<Option<String>> {
        let Some(args) = directives(carrier, "delegate").next() else {
            return Ok(None);
        };
        match pairs("delegate", args)?.first() {
            Some(&("name", value)) => Ok(Some(value.to_owned())),
            Some(&(key, _)) => Err(AnnotationError::InvalidDelegateKey(key.to_owned())),
            None => Ok(None),
        }
    }

    fn deprecated(&self, _kind: EntityKind, carrier: &Carrier) -> AnnotationResult<bool> {
        Ok(directives(carrier, "deprecated").next().is_some())
    }

    fn validate_directives(
        &self,
        _kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ValidateDirectives> {
        let mut found = ValidateDirectives::default();
        for args in directives(carrier, "validate") {
            for (key, value) in pairs("validate", args)? {
                match key {
                    "required" => found.required = flag("validate", key, value)?,
                    "min" => found.min = Some(value.to_owned()),
                    "max" => found.max = Some(value.to_owned()),
                    "in" => {
                        found.members = Some(value.split(',').map(str::to_owned).collect());
                    }
                    "is" => found.format = Some(value.to_owned()),
                    _ => {
                        return Err(AnnotationError::malformed(
                            "validate",
                            format!("{key}={value}"),
                        ));
                    }
                }
            }
        }
        Ok(found)
    }

    fn receive_directives(
        &self,
        _kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ReceiveDirectives> {
        let mut found = ReceiveDirectives::default();
        for args in directives(carrier, "receive") {
            for (key, value) in pairs("receive", args)? {
                match key {
                    "required" => found.required = flag("receive", key, value)?,
                    "name" => found.names.push(value.to_owned()),
                    _ => {
                        return Err(AnnotationError::malformed(
                            "receive",
                            format!("{key}={value}"),
                        ));
                    }
                }
            }
        }
        Ok(found)
    }
}
