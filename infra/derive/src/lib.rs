#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the serialization façade crates.
//!
//! * [`macro@dser_error`] wires a domain error enum into `thiserror`, `?` conversions and
//!   `.context(..)` helpers.
//! * [`macro@Shape`] declares the structural shape of a type (members and related types) so
//!   it can be registered with a serialization configuration.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! dser-derive = { path = "../infra/derive" }
//! ```
//!
//! The examples below are `ignore`d to avoid compiling in this crate; the consuming crates
//! exercise them in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
/// * **Variant Names**: Generates `fn variant(&self) -> &'static str`, handy as a structured
///   `tracing` field.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use dser_derive::dser_error;
/// use std::borrow::Cow;
///
/// #[dser_error]
/// pub enum CodecError {
///     #[error("JSON error{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(raw: &str) -> Result<serde_json::Value, CodecError> {
///     serde_json::from_str(raw).context("Decoding payload")
/// }
/// ```
#[proc_macro_attribute]
pub fn dser_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Derives `dser_registry::Shape` for a struct or enum.
///
/// Every field type (for enums: every variant payload type) becomes a *member* of the shape.
/// Type parameters become generic arguments of the type representation and related types; they
/// must implement `Shape` themselves.
///
/// # Attributes
///
/// * `#[shape(namespace = "billing")]` - overrides the namespace (defaults to `module_path!()`).
/// * `#[shape(name = "Invoice")]` - overrides the type name (defaults to the ident).
/// * `#[shape(related(Money, Currency))]` - declares structurally related types.
/// * `#[shape(adapter)]` - marks the type as having a custom serde adapter.
/// * `#[shape(opaque)]` - marks the type as having no serializable structure.
/// * `#[shape(crate = "dser::registry")]` - path to the registry crate when it is re-exported.
/// * `#[shape(skip)]` on a field - excludes the field type from the members.
///
/// # Example
///
/// ```rust,ignore
/// use dser_registry::Shape;
///
/// #[derive(Shape)]
/// #[shape(namespace = "billing", related(Currency))]
/// struct Invoice {
///     id: u64,
///     lines: Vec<InvoiceLine>,
/// }
/// ```
#[proc_macro_derive(Shape, attributes(shape))]
pub fn derive_shape(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::shape::expand_derive(input).into()
}
