//! Derive support for `glint_inspect`.
//!
//! See [`Inspect`](macro@Inspect).

#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DataEnum, DataStruct, DeriveInput, Expr, ExprLit, ExprPath, ExprUnary, Field, Fields,
    Ident, Lit, LitStr, Type, UnOp, parse_macro_input,
};

static INSPECT_ATTRIBUTE_NAME: &str = "inspect";

// -----------------------------------------------------------------------------
// Entry point

/// Derives the introspection traits of `glint_inspect`.
///
/// # Structs with named fields
///
/// Implements `Inspect`, `Members`, `Structured`, and `FromInspect`, and
/// (with the `auto_register` feature) submits the type to the type scan.
/// The type must be `Clone + Send + Sync + 'static` and non-generic.
///
/// ```rust, ignore
/// #[derive(Inspect, Clone)]
/// struct Stats {
///     hp: u32,
///     #[inspect(skip)]
///     scratch: u64,
/// }
/// ```
///
/// ## Field attributes
///
/// - `#[inspect(skip)]`: leave the field out of the member table.
/// - `#[inspect(base)]`: mark the embedded base struct; member lookup
///   continues into it, and members of the deriving type shadow base
///   members of the same name. At most one field can be the base.
///
/// ## Properties
///
/// Computed members are declared at the type level; the getter takes
/// `&Self` and returns the value, the setter takes `&mut Self` and the
/// value. Omitting `set` makes the property read-only.
///
/// ```rust, ignore
/// #[derive(Inspect, Clone)]
/// #[inspect(property(name = "ratio", ty = "f32", get = "Self::ratio", set = "Self::set_ratio"))]
/// struct Health {
///     hp: u32,
///     max: u32,
/// }
///
/// impl Health {
///     fn ratio(&self) -> f32 { self.hp as f32 / self.max as f32 }
///     fn set_ratio(&mut self, r: f32) { self.hp = (self.max as f32 * r) as u32; }
/// }
/// ```
///
/// # Fieldless enums
///
/// With an explicit integer `#[repr]`, implements `Inspect` and
/// `FromInspect` as a leaf whose scalar hooks route through the
/// underlying integer, so the marshaler can move the value as its
/// discriminant. Values that name no variant are rejected on write.
///
/// ```rust, ignore
/// #[derive(Inspect, Clone, Copy)]
/// #[repr(u8)]
/// enum BlendMode {
///     Normal = 0,
///     Add = 1,
///     Multiply = 2,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(Inspect)]` does not support generic types",
        ));
    }
    match &input.data {
        Data::Struct(data) => expand_struct(input, data),
        Data::Enum(data) => expand_enum(input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "`#[derive(Inspect)]` does not support unions",
        )),
    }
}

// -----------------------------------------------------------------------------
// Structs

struct MemberField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    base: bool,
}

struct PropertyDef {
    name: String,
    ty: Type,
    getter: ExprPath,
    setter: Option<ExprPath>,
}

fn expand_struct(input: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream2> {
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`#[derive(Inspect)]` supports structs with named fields (and fieldless enums)",
        ));
    };

    let mut members: Vec<MemberField<'_>> = Vec::new();
    for field in &named.named {
        let (skip, base) = field_flags(field)?;
        if skip {
            if base {
                return Err(syn::Error::new_spanned(
                    field,
                    "a field cannot be both `skip` and `base`",
                ));
            }
            continue;
        }
        let Some(ident) = &field.ident else { continue };
        members.push(MemberField {
            ident,
            ty: &field.ty,
            base,
        });
    }

    let mut base_index: Option<usize> = None;
    for (index, member) in members.iter().enumerate() {
        if member.base {
            if base_index.is_some() {
                return Err(syn::Error::new_spanned(
                    member.ident,
                    "at most one field can be marked `#[inspect(base)]`",
                ));
            }
            base_index = Some(index);
        }
    }

    let properties = type_properties(input)?;

    let name = &input.ident;
    let name_str = name.to_string();

    let field_arms_ref = members.iter().enumerate().map(|(i, member)| {
        let ident = member.ident;
        quote! { #i => ::core::option::Option::Some(&self.#ident as &dyn glint_inspect::Inspect), }
    });
    let field_arms_mut = members.iter().enumerate().map(|(i, member)| {
        let ident = member.ident;
        quote! { #i => ::core::option::Option::Some(&mut self.#ident as &mut dyn glint_inspect::Inspect), }
    });
    let field_schemas = members.iter().map(|member| {
        let name = member.ident.to_string();
        let ty = member.ty;
        quote! {
            glint_inspect::schema::FieldSchema::new(
                #name,
                glint_inspect::shape::TypeShape::of::<#ty>,
            )
        }
    });

    let prop_get_arms = properties.iter().enumerate().map(|(i, prop)| {
        let getter = &prop.getter;
        quote! {
            #i => ::core::option::Option::Some(
                glint_inspect::__macro_exports::Box::new(#getter(self))
                    as glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>,
            ),
        }
    });
    let prop_set_arms = properties.iter().enumerate().map(|(i, prop)| {
        let ty = &prop.ty;
        match &prop.setter {
            Some(setter) => quote! {
                #i => match value.take::<#ty>() {
                    ::core::result::Result::Ok(v) => {
                        #setter(self, v);
                        ::core::result::Result::Ok(())
                    }
                    ::core::result::Result::Err(rejected) => {
                        ::core::result::Result::Err(rejected)
                    }
                },
            },
            None => quote! {
                #i => ::core::result::Result::Err(value),
            },
        }
    });
    let prop_schemas = properties.iter().map(|prop| {
        let name = &prop.name;
        let ty = &prop.ty;
        let writable = prop.setter.is_some();
        quote! {
            glint_inspect::schema::PropertySchema::new(
                #name,
                glint_inspect::shape::TypeShape::of::<#ty>,
                #writable,
            )
        }
    });

    let base_tokens = match base_index {
        Some(index) => {
            let base_ty = members[index].ty;
            quote! {
                ::core::option::Option::Some(glint_inspect::schema::BaseLink::new(
                    #index,
                    <#base_ty as glint_inspect::ops::Structured>::struct_schema,
                ))
            }
        }
        None => quote! { ::core::option::Option::None },
    };

    let auto_register = auto_register_tokens(name, true);

    Ok(quote! {
        const _: () = {
            impl glint_inspect::Inspect for #name {
                #[inline]
                fn shape(&self) -> glint_inspect::shape::TypeShape {
                    glint_inspect::shape::TypeShape::of::<Self>()
                }

                #[inline]
                fn kind(&self) -> glint_inspect::shape::InspectKind {
                    glint_inspect::shape::InspectKind::Struct
                }

                #[inline]
                fn inspect_ref(&self) -> glint_inspect::ops::InspectRef<'_> {
                    glint_inspect::ops::InspectRef::Struct(self)
                }

                #[inline]
                fn inspect_mut(&mut self) -> glint_inspect::ops::InspectMut<'_> {
                    glint_inspect::ops::InspectMut::Struct(self)
                }

                #[inline]
                fn clone_boxed(&self) -> glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect> {
                    glint_inspect::__macro_exports::Box::new(::core::clone::Clone::clone(self))
                }

                fn assign(
                    &mut self,
                    value: glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>,
                ) -> ::core::result::Result<(), glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>> {
                    *self = value.take::<Self>()?;
                    ::core::result::Result::Ok(())
                }
            }

            impl glint_inspect::ops::Members for #name {
                #[inline]
                fn schema(&self) -> &'static glint_inspect::schema::StructSchema {
                    <Self as glint_inspect::ops::Structured>::struct_schema()
                }

                fn field(&self, index: usize) -> ::core::option::Option<&dyn glint_inspect::Inspect> {
                    match index {
                        #(#field_arms_ref)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn glint_inspect::Inspect> {
                    match index {
                        #(#field_arms_mut)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn get_property(
                    &self,
                    index: usize,
                ) -> ::core::option::Option<glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>> {
                    match index {
                        #(#prop_get_arms)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn set_property(
                    &mut self,
                    index: usize,
                    value: glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>,
                ) -> ::core::result::Result<(), glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>> {
                    match index {
                        #(#prop_set_arms)*
                        _ => ::core::result::Result::Err(value),
                    }
                }
            }

            impl glint_inspect::ops::Structured for #name {
                fn struct_schema() -> &'static glint_inspect::schema::StructSchema {
                    static FIELDS: &[glint_inspect::schema::FieldSchema] = &[
                        #(#field_schemas),*
                    ];
                    static PROPS: &[glint_inspect::schema::PropertySchema] = &[
                        #(#prop_schemas),*
                    ];
                    static SCHEMA: glint_inspect::schema::StructSchema =
                        glint_inspect::schema::StructSchema::new(#name_str, FIELDS, PROPS, #base_tokens);
                    &SCHEMA
                }
            }

            impl glint_inspect::FromInspect for #name {
                fn from_inspect(value: &dyn glint_inspect::Inspect) -> ::core::option::Option<Self> {
                    match value.downcast_ref::<Self>() {
                        ::core::option::Option::Some(v) => {
                            ::core::option::Option::Some(::core::clone::Clone::clone(v))
                        }
                        ::core::option::Option::None => ::core::option::Option::None,
                    }
                }
            }

            #auto_register
        };
    })
}

fn field_flags(field: &Field) -> syn::Result<(bool, bool)> {
    let mut skip = false;
    let mut base = false;
    for attr in &field.attrs {
        if !attr.path().is_ident(INSPECT_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("base") {
                base = true;
                Ok(())
            } else {
                Err(meta.error("unsupported `inspect` field attribute"))
            }
        })?;
    }
    Ok((skip, base))
}

fn type_properties(input: &DeriveInput) -> syn::Result<Vec<PropertyDef>> {
    let mut properties = Vec::new();
    for attr in &input.attrs {
        if !attr.path().is_ident(INSPECT_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("property") {
                return Err(meta.error("unsupported `inspect` type attribute"));
            }
            let mut name: Option<String> = None;
            let mut ty: Option<Type> = None;
            let mut getter: Option<ExprPath> = None;
            let mut setter: Option<ExprPath> = None;
            meta.parse_nested_meta(|inner| {
                let lit: LitStr = inner.value()?.parse()?;
                if inner.path.is_ident("name") {
                    name = Some(lit.value());
                } else if inner.path.is_ident("ty") {
                    ty = Some(lit.parse()?);
                } else if inner.path.is_ident("get") {
                    getter = Some(lit.parse()?);
                } else if inner.path.is_ident("set") {
                    setter = Some(lit.parse()?);
                } else {
                    return Err(inner.error("unsupported `property` key"));
                }
                Ok(())
            })?;
            let name = name.ok_or_else(|| meta.error("`property` requires `name = \"...\"`"))?;
            let ty = ty.ok_or_else(|| meta.error("`property` requires `ty = \"...\"`"))?;
            let getter =
                getter.ok_or_else(|| meta.error("`property` requires `get = \"...\"`"))?;
            properties.push(PropertyDef {
                name,
                ty,
                getter,
                setter,
            });
            Ok(())
        })?;
    }
    Ok(properties)
}

// -----------------------------------------------------------------------------
// Enums

fn expand_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let repr = enum_repr(input)?;
    let signed = repr.to_string().starts_with('i');

    let mut variants: Vec<(&Ident, i128)> = Vec::new();
    let mut next: i128 = 0;
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`#[derive(Inspect)]` supports only fieldless enum variants",
            ));
        }
        let value = match &variant.discriminant {
            Some((_, expr)) => discriminant_value(expr)?,
            None => next,
        };
        next = value + 1;
        variants.push((&variant.ident, value));
    }

    let arms_to = variants.iter().map(|(ident, value)| {
        let lit = int_literal(*value, signed);
        quote! { Self::#ident => #lit, }
    });
    let arms_from = variants.iter().map(|(ident, value)| {
        let lit = int_literal(*value, signed);
        quote! { #lit => ::core::option::Option::Some(Self::#ident), }
    });
    let arms_set = variants.iter().map(|(ident, value)| {
        let lit = int_literal(*value, signed);
        quote! {
            #lit => {
                *self = Self::#ident;
                ::core::result::Result::Ok(())
            }
        }
    });

    let (scalar_variant, to_fn) = if signed {
        (quote! { I64 }, quote! { to_i64 })
    } else {
        (quote! { U64 }, quote! { to_u64 })
    };

    let auto_register = auto_register_tokens(name, false);

    Ok(quote! {
        const _: () = {
            impl glint_inspect::Inspect for #name {
                #[inline]
                fn shape(&self) -> glint_inspect::shape::TypeShape {
                    glint_inspect::shape::TypeShape::of::<Self>()
                }

                #[inline]
                fn kind(&self) -> glint_inspect::shape::InspectKind {
                    glint_inspect::shape::InspectKind::Leaf
                }

                #[inline]
                fn inspect_ref(&self) -> glint_inspect::ops::InspectRef<'_> {
                    glint_inspect::ops::InspectRef::Leaf(self)
                }

                #[inline]
                fn inspect_mut(&mut self) -> glint_inspect::ops::InspectMut<'_> {
                    glint_inspect::ops::InspectMut::Leaf(self)
                }

                #[inline]
                fn clone_boxed(&self) -> glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect> {
                    glint_inspect::__macro_exports::Box::new(::core::clone::Clone::clone(self))
                }

                fn assign(
                    &mut self,
                    value: glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>,
                ) -> ::core::result::Result<(), glint_inspect::__macro_exports::Box<dyn glint_inspect::Inspect>> {
                    *self = value.take::<Self>()?;
                    ::core::result::Result::Ok(())
                }

                #[inline]
                fn as_scalar(&self) -> ::core::option::Option<glint_inspect::scalar::Scalar> {
                    ::core::option::Option::Some(glint_inspect::scalar::Scalar::#scalar_variant(
                        match self {
                            #(#arms_to)*
                        },
                    ))
                }

                fn set_scalar(
                    &mut self,
                    value: glint_inspect::scalar::Scalar,
                ) -> ::core::result::Result<(), glint_inspect::scalar::Scalar> {
                    let ::core::option::Option::Some(v) = value.#to_fn() else {
                        return ::core::result::Result::Err(value);
                    };
                    match v {
                        #(#arms_set)*
                        _ => ::core::result::Result::Err(value),
                    }
                }
            }

            impl glint_inspect::FromInspect for #name {
                fn from_inspect(value: &dyn glint_inspect::Inspect) -> ::core::option::Option<Self> {
                    if let ::core::option::Option::Some(v) = value.downcast_ref::<Self>() {
                        return ::core::option::Option::Some(::core::clone::Clone::clone(v));
                    }
                    let v = value.as_scalar()?.#to_fn()?;
                    match v {
                        #(#arms_from)*
                        _ => ::core::option::Option::None,
                    }
                }
            }

            #auto_register
        };
    })
}

fn enum_repr(input: &DeriveInput) -> syn::Result<Ident> {
    const INT_REPRS: &[&str] = &[
        "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    ];
    let mut found = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident()
                && INT_REPRS.contains(&ident.to_string().as_str())
            {
                found = Some(ident.clone());
            }
            Ok(())
        })?;
    }
    found.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "`#[derive(Inspect)]` on an enum requires an explicit integer `#[repr]`",
        )
    })
}

fn discriminant_value(expr: &Expr) -> syn::Result<i128> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => discriminant_value(expr).map(|value| -value),
        _ => Err(syn::Error::new_spanned(
            expr,
            "enum discriminants must be integer literals",
        )),
    }
}

fn int_literal(value: i128, signed: bool) -> TokenStream2 {
    if signed {
        let lit = proc_macro2::Literal::i64_suffixed(value as i64);
        quote! { #lit }
    } else {
        let lit = proc_macro2::Literal::u64_suffixed(value as u64);
        quote! { #lit }
    }
}

// -----------------------------------------------------------------------------
// Auto registration

fn auto_register_tokens(name: &Ident, structured: bool) -> TokenStream2 {
    if !cfg!(feature = "auto_register") {
        return TokenStream2::new();
    }
    let entry = if structured {
        quote! {
            glint_inspect::scan::TypeEntry::with_schema(
                glint_inspect::shape::TypeShape::of::<#name>,
                <#name as glint_inspect::ops::Structured>::struct_schema,
            )
        }
    } else {
        quote! {
            glint_inspect::scan::TypeEntry::new(
                glint_inspect::shape::TypeShape::of::<#name>,
            )
        }
    };
    quote! {
        glint_inspect::__macro_exports::inventory::submit! { #entry }
    }
}
