use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Field, GenericParam, LitStr, Path, Token, Type, parenthesized};

#[derive(Default)]
struct ShapeArgs {
    namespace: Option<LitStr>,
    name: Option<LitStr>,
    related: Vec<Type>,
    adapter: bool,
    opaque: bool,
    krate: Option<Path>,
}

fn parse_shape_args(input: &DeriveInput) -> Result<ShapeArgs, TokenStream> {
    let mut args = ShapeArgs::default();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("shape")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("namespace") {
                args.namespace = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("name") {
                args.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                args.krate = Some(lit.parse()?);
            } else if meta.path.is_ident("related") {
                let content;
                parenthesized!(content in meta.input);
                let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                args.related.extend(types);
            } else if meta.path.is_ident("adapter") {
                args.adapter = true;
            } else if meta.path.is_ident("opaque") {
                args.opaque = true;
            } else {
                return Err(meta.error(
                    "unsupported shape argument; expected one of \
                     `namespace`, `name`, `related`, `adapter`, `opaque`, `crate`",
                ));
            }
            Ok(())
        })
        .map_err(syn::Error::into_compile_error)?;
    }

    Ok(args)
}

fn is_skipped(field: &Field) -> Result<bool, TokenStream> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("shape")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("only `skip` is supported on fields"))
            }
        })
        .map_err(syn::Error::into_compile_error)?;
    }
    Ok(skip)
}

/// Collects the distinct member types in declaration order.
fn member_types(input: &DeriveInput) -> Result<Vec<Type>, TokenStream> {
    let fields: Vec<&Field> = match &input.data {
        Data::Struct(data) => data.fields.iter().collect(),
        Data::Enum(data) => data.variants.iter().flat_map(|v| v.fields.iter()).collect(),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Shape can only be derived for structs and enums",
            )
            .to_compile_error());
        },
    };

    let mut seen = FxHashSet::default();
    let mut types = Vec::new();
    for field in fields {
        if is_skipped(field)? {
            continue;
        }
        if seen.insert(field.ty.to_token_stream().to_string()) {
            types.push(field.ty.clone());
        }
    }
    Ok(types)
}

/// Expands `#[derive(Shape)]`.
pub fn expand_derive(input: DeriveInput) -> TokenStream {
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return syn::Error::new_spanned(lifetime, "Shape requires a `'static` type without lifetimes")
            .to_compile_error();
    }

    let args = match parse_shape_args(&input) {
        Ok(args) => args,
        Err(err) => return err,
    };
    let members = match member_types(&input) {
        Ok(members) => members,
        Err(err) => return err,
    };

    let krate = args.krate.map_or_else(|| quote! { ::dser_registry }, |path| quote! { #path });
    let ident = &input.ident;
    let name = args.name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let namespace = args.namespace.map_or_else(|| quote! { module_path!() }, |ns| quote! { #ns });

    let kind = match (&input.data, args.opaque) {
        (_, true) => quote! { #krate::ShapeKind::Opaque },
        (Data::Enum(_), false) => quote! { #krate::ShapeKind::Enum },
        _ => quote! { #krate::ShapeKind::Struct },
    };

    let type_params: Vec<_> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for param in &type_params {
            where_clause.predicates.push(syn::parse_quote!(#param: #krate::Shape));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let adapter = args.adapter;
    let related = &args.related;

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Shape for #ident #ty_generics #where_clause {
            fn shape() -> #krate::TypeShape {
                #krate::TypeShape::builder::<Self>(#namespace, #name)
                    .kind(#kind)
                    #( .generic_argument(<#type_params as #krate::Shape>::shape().representation().clone()) )*
                    #( .member(<#members as #krate::Shape>::shape) )*
                    #( .related(<#type_params as #krate::Shape>::shape) )*
                    #( .related(<#related as #krate::Shape>::shape) )*
                    .adapter(#adapter)
                    .build()
            }
        }
    }
}
