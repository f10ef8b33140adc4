#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros backing the workspace error idiom.
//! The only macro exported here is [`macro@beacon_error`]; every error enum in
//! the workspace is declared through it so that context handling and upstream
//! conversions look the same everywhere.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! beacon-derive = { path = "../infra/derive" }
//! ```
//!
//! The macro docstring example is `ignore`d to avoid compiling in this crate;
//! copy it into consuming crates' tests as needed.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// Transforms a plain enum into a fully-featured error type so consuming
/// crates never hand-write the same conversion boilerplate twice.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` convertible into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants carrying a `source`
///   field, enabling the `?` operator on upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants wrapping external errors must include a `source: T` field or a field
///    marked with `#[source]`/`#[from]` (compatible with `thiserror`), together with
///    a `context: Option<Cow<'static, str>>` field.
/// 3. Tuple or unit variants are rejected to keep error wiring explicit.
///
/// # Generated Items
///
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` when a source field exists.
/// * `From<SourceError>` impls for source-bearing variants (skipped for `Internal`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant is present.
/// * A `format_context` helper used from `#[error(...)]` display attributes.
///
/// # Example
///
/// ```rust,ignore
/// use beacon_derive::beacon_error;
/// use std::borrow::Cow;
///
/// #[beacon_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io {
///         #[source]
///         source: std::io::Error,
///         context: Option<Cow<'static, str>>,
///     },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// // Usage:
/// fn load(path: &std::path::Path) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Reading the snapshot file")
/// }
/// ```
#[proc_macro_attribute]
pub fn beacon_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
