use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, FieldsNamed, Ident, Type, Variant};

struct VariantInfo<'a> {
    ident: &'a Ident,
    source_ident: Option<&'a Ident>,
    source_ty: Option<&'a Type>,
    has_context: bool,
    cfg_attrs: Vec<&'a Attribute>,
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "beacon_error can only be applied to enums")
            .to_compile_error();
    };

    let variants = match data.variants.iter().map(VariantInfo::parse).collect::<syn::Result<Vec<_>>>() {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };

    let enum_ident = &input.ident;
    let ext_ident = format_ident!("{}Ext", enum_ident);

    let derives = missing_derives(&input);
    let ext_trait = ext_trait(enum_ident, &ext_ident, &variants);
    let conversions = variants.iter().filter_map(|v| v.conversions(enum_ident, &ext_ident));
    let literal_conversions = literal_conversions(enum_ident, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext_trait
        #(#conversions)*
        #literal_conversions

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

impl<'a> VariantInfo<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "beacon_error requires named fields for source/context handling",
            ));
        };

        let has_context = context_field(fields)?;
        let source = source_field(fields);
        if source.is_some() && !has_context {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "beacon_error requires `context: Option<Cow<'static, str>>` for variants with a source",
            ));
        }

        let cfg_attrs = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect();

        Ok(Self {
            ident: &variant.ident,
            source_ident: source.and_then(|field| field.ident.as_ref()),
            source_ty: source.map(|field| &field.ty),
            has_context,
            cfg_attrs,
        })
    }

    /// `From<Source>` plus a `.context()` impl for results carrying the source error.
    ///
    /// The `Internal` variant is excluded: it is reserved for the `From<&str>` and
    /// `From<String>` fallbacks generated by [`literal_conversions`].
    fn conversions(&self, enum_ident: &Ident, ext_ident: &Ident) -> Option<TokenStream> {
        if self.ident == "Internal" {
            return None;
        }
        let source_ident = self.source_ident?;
        let source_ty = self.source_ty?;
        let variant = self.ident;
        let cfg_attrs = &self.cfg_attrs;

        Some(quote! {
            #(#cfg_attrs)*
            #[automatically_derived]
            impl From<#source_ty> for #enum_ident {
                #[inline]
                fn from(#source_ident: #source_ty) -> Self {
                    Self::#variant { #source_ident, context: None }
                }
            }

            #(#cfg_attrs)*
            impl<T> #ext_ident<T> for std::result::Result<T, #source_ty> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #enum_ident> {
                    self.map_err(|#source_ident| #enum_ident::#variant { #source_ident, context: Some(context.into()) })
                }
            }
        })
    }
}

fn context_field(fields: &FieldsNamed) -> syn::Result<bool> {
    let field = fields.named.iter().find(|field| {
        field.ident.as_ref().is_some_and(|ident| ident == "context")
    });
    match field {
        None => Ok(false),
        Some(field) if is_context_type(&field.ty) => Ok(true),
        Some(field) => Err(syn::Error::new_spanned(
            &field.ty,
            "context field must be Option<Cow<'static, str>>",
        )),
    }
}

fn source_field(fields: &FieldsNamed) -> Option<&syn::Field> {
    fields.named.iter().find(|field| {
        field.ident.as_ref().is_some_and(|ident| ident == "source")
            || field
                .attrs
                .iter()
                .any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
    })
}

fn ext_trait(enum_ident: &Ident, ext_ident: &Ident, variants: &[VariantInfo<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        quote! { #(#cfg_attrs)* #enum_ident::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext_ident<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #enum_ident>;
        }

        #[automatically_derived]
        impl<T> #ext_ident<T> for Result<T, #enum_ident> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut error| {
                    #[allow(unreachable_patterns)]
                    match &mut error {
                        #(#arms)*
                        _ => {}
                    }
                    error
                })
            }
        }
    }
}

fn literal_conversions(enum_ident: &Ident, variants: &[VariantInfo<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #enum_ident {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #enum_ident {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let declared = declared_derives(input);
    let mut extra = Vec::new();
    if !declared.contains("Debug") {
        extra.push(quote! { Debug });
    }
    if !declared.contains("Error") {
        extra.push(quote! { ::thiserror::Error });
    }
    if extra.is_empty() { quote!() } else { quote! { #[derive(#(#extra),*)] } }
}

fn declared_derives(input: &DeriveInput) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.segments.last().map(|seg| seg.ident.to_string()) {
                traits.insert(ident);
            }
            Ok(())
        });
    }

    traits
}

/// Structural check for `Option<Cow<'static, str>>`, path prefixes ignored.
fn is_context_type(ty: &Type) -> bool {
    context_type(ty).is_some()
}

fn context_type(ty: &Type) -> Option<()> {
    let Type::Path(path) = ty else { return None };
    let outer = path.path.segments.last()?;
    (outer.ident == "Option").then_some(())?;

    let syn::PathArguments::AngleBracketed(args) = &outer.arguments else { return None };
    let syn::GenericArgument::Type(Type::Path(inner)) = args.args.first()? else { return None };
    let cow = inner.path.segments.last()?;
    (cow.ident == "Cow").then_some(())?;

    let syn::PathArguments::AngleBracketed(cow_args) = &cow.arguments else { return None };
    let mut cow_args = cow_args.args.iter();
    let syn::GenericArgument::Lifetime(lifetime) = cow_args.next()? else { return None };
    (lifetime.ident == "static").then_some(())?;
    let syn::GenericArgument::Type(Type::Path(target)) = cow_args.next()? else { return None };
    (target.path.segments.last()?.ident == "str").then_some(())
}
