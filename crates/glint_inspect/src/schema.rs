//! Static member tables for struct-like types.
//!
//! One [`StructSchema`] per introspectable type, generated by the derive
//! macro; name resolution runs against these tables instead of any kind
//! of runtime discovery. A schema distinguishes fields from properties
//! and may link to a base schema, forming the chain the member cache
//! walks.

use core::fmt;

use crate::shape::TypeShape;

// -----------------------------------------------------------------------------
// FieldSchema

/// Description of one stored field.
#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    name: &'static str,
    // Shape is computed on access; a function pointer keeps the table const.
    shape: fn() -> TypeShape,
}

impl FieldSchema {
    /// Creates a new `FieldSchema` for the given field name and shape.
    #[inline]
    pub const fn new(name: &'static str, shape: fn() -> TypeShape) -> Self {
        Self { name, shape }
    }

    /// Returns the field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field's declared [`TypeShape`].
    #[inline]
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

// -----------------------------------------------------------------------------
// PropertySchema

/// Description of one computed property: a getter and, when writable, a
/// setter over an owned value of the declared type.
#[derive(Clone, Copy, Debug)]
pub struct PropertySchema {
    name: &'static str,
    shape: fn() -> TypeShape,
    writable: bool,
}

impl PropertySchema {
    /// Creates a new `PropertySchema`.
    #[inline]
    pub const fn new(name: &'static str, shape: fn() -> TypeShape, writable: bool) -> Self {
        Self {
            name,
            shape,
            writable,
        }
    }

    /// Returns the property name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the property's declared [`TypeShape`].
    #[inline]
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }

    /// Returns `true` if the property has a setter.
    #[inline]
    pub const fn writable(&self) -> bool {
        self.writable
    }
}

// -----------------------------------------------------------------------------
// BaseLink

/// Link from a schema to the embedded field standing in for its base type.
#[derive(Clone, Copy, Debug)]
pub struct BaseLink {
    field: usize,
    schema: fn() -> &'static StructSchema,
}

impl BaseLink {
    /// Creates a new `BaseLink` for the field at `field` in the owner's
    /// field table.
    #[inline]
    pub const fn new(field: usize, schema: fn() -> &'static StructSchema) -> Self {
        Self { field, schema }
    }

    /// Returns the index of the base field in the owner's field table.
    #[inline]
    pub const fn field(&self) -> usize {
        self.field
    }

    /// Returns the base type's schema.
    #[inline]
    pub fn schema(&self) -> &'static StructSchema {
        (self.schema)()
    }
}

// -----------------------------------------------------------------------------
// StructSchema

/// The static member table of a struct-like type.
///
/// # Examples
///
/// ```
/// use glint_inspect::{derive::Inspect, ops::Structured};
///
/// #[derive(Inspect, Clone)]
/// struct Foo {
///     a: i32,
///     b: bool,
/// }
///
/// let schema = Foo::struct_schema();
/// assert_eq!(schema.name(), "Foo");
/// assert_eq!(schema.field_index("b"), Some(1));
/// assert_eq!(schema.field_index("c"), None);
/// ```
#[derive(Debug)]
pub struct StructSchema {
    name: &'static str,
    fields: &'static [FieldSchema],
    properties: &'static [PropertySchema],
    base: Option<BaseLink>,
}

impl StructSchema {
    /// Creates a new `StructSchema`.
    #[inline]
    pub const fn new(
        name: &'static str,
        fields: &'static [FieldSchema],
        properties: &'static [PropertySchema],
        base: Option<BaseLink>,
    ) -> Self {
        Self {
            name,
            fields,
            properties,
            base,
        }
    }

    /// Returns the type's short name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field table.
    #[inline]
    pub const fn fields(&self) -> &'static [FieldSchema] {
        self.fields
    }

    /// Returns the property table.
    #[inline]
    pub const fn properties(&self) -> &'static [PropertySchema] {
        self.properties
    }

    /// Returns the base link, if this type embeds a base.
    #[inline]
    pub const fn base(&self) -> Option<&BaseLink> {
        self.base.as_ref()
    }

    /// Returns the index of the field with the given name. Exact match.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// Returns the index of the property with the given name.
    ///
    /// Exact matches win; as a convenience, property names also match
    /// ASCII case-insensitively. Fields never do.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|prop| prop.name() == name)
            .or_else(|| {
                self.properties
                    .iter()
                    .position(|prop| prop.name().eq_ignore_ascii_case(name))
            })
    }
}

impl fmt::Display for StructSchema {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
