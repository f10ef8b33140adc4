use beacon_derive::beacon_error;
use std::borrow::Cow;

#[beacon_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn from_source_leaves_context_empty() {
    let err: DemoError = std::io::Error::other("boom").into();
    assert_eq!(err.to_string(), "IO error: boom");
}

#[test]
fn context_on_source_result_is_rendered() {
    let result: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
    let err = result.context("opening the state file").unwrap_err();
    assert_eq!(err.to_string(), "IO error (opening the state file): boom");
}

#[test]
fn context_on_enum_result_fills_empty_slot() {
    let result: Result<(), DemoError> = Err(std::io::Error::other("boom").into());
    let err = result.context("flushing buffers").unwrap_err();
    assert_eq!(err.to_string(), "IO error (flushing buffers): boom");
}

#[test]
fn internal_from_literals() {
    let err = DemoError::from("invariant violated");
    assert_eq!(err.to_string(), "Internal error: invariant violated");

    let err = DemoError::from(String::from("owned message"));
    assert_eq!(err.to_string(), "Internal error: owned message");
}

#[test]
fn source_chain_is_preserved() {
    use std::error::Error as _;

    let err: DemoError = std::io::Error::other("boom").into();
    let source = err.source().expect("source should be preserved");
    assert_eq!(source.to_string(), "boom");
}

#[test]
fn beacon_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/beacon_error_pass.rs");
    t.compile_fail("tests/ui/beacon_error_no_context.rs");
    t.compile_fail("tests/ui/beacon_error_bad_context_type.rs");
    t.compile_fail("tests/ui/beacon_error_tuple_variant.rs");
}
