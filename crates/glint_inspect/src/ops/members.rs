use crate::Inspect;
use crate::schema::StructSchema;

// -----------------------------------------------------------------------------
// Members

/// A trait for type-erased named-member access.
///
/// This is the view the engine takes of any struct-like value: an indexed
/// table of **fields** (borrowable storage) and **properties**
/// (getter/setter pairs that produce and consume owned values). The member
/// table is described by a static [`StructSchema`], which may carry a base
/// link to an embedded struct standing in for a base class; member
/// resolution walks that chain.
///
/// Indices used by [`field`], [`get_property`], and friends are indices
/// into the schema's tables, not declaration order of the Rust type; the
/// derive macro skips `#[inspect(skip)]` fields.
///
/// # Examples
///
/// ```
/// use glint_inspect::{derive::Inspect, ops::Members};
///
/// #[derive(Inspect, Clone)]
/// struct Foo {
///     a: i32,
///     b: bool,
/// }
///
/// let foo = Foo { a: 11, b: true };
/// let members: &dyn Members = &foo;
///
/// assert_eq!(members.schema().fields().len(), 2);
/// assert_eq!(members.field_as::<i32>(0), Some(&11));
/// assert_eq!(members.field_as::<bool>(1), Some(&true));
/// ```
///
/// [`field`]: Members::field
/// [`get_property`]: Members::get_property
pub trait Members: Inspect {
    /// Returns the static member table of this type.
    fn schema(&self) -> &'static StructSchema;

    /// Returns a reference to the field at `index` in the schema's field
    /// table, or `None` if out of bounds.
    fn field(&self, index: usize) -> Option<&dyn Inspect>;

    /// Returns a mutable reference to the field at `index`, or `None` if
    /// out of bounds.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Inspect>;

    /// Invokes the getter of the property at `index` in the schema's
    /// property table, returning the produced value.
    fn get_property(&self, index: usize) -> Option<Box<dyn Inspect>>;

    /// Invokes the setter of the property at `index` with `value`.
    ///
    /// Returns the value unchanged if the index is out of bounds, the
    /// property is read-only, or the value's type does not match the
    /// property's declared type.
    fn set_property(&mut self, index: usize, value: Box<dyn Inspect>)
    -> Result<(), Box<dyn Inspect>>;
}

impl dyn Members {
    /// Returns a typed reference to the field at `index`.
    ///
    /// Returns `None` if the index is out of bounds or the field cannot be
    /// downcast to `T`.
    #[inline]
    pub fn field_as<T: Inspect>(&self, index: usize) -> Option<&T> {
        self.field(index).and_then(<dyn Inspect>::downcast_ref)
    }

    /// Returns a typed mutable reference to the field at `index`.
    #[inline]
    pub fn field_mut_as<T: Inspect>(&mut self, index: usize) -> Option<&mut T> {
        self.field_mut(index).and_then(<dyn Inspect>::downcast_mut)
    }

    /// Returns a reference to the field with the given name in this type's
    /// own schema (no base-chain walk; use the member cache for that).
    #[inline]
    pub fn field_named(&self, name: &str) -> Option<&dyn Inspect> {
        self.field(self.schema().field_index(name)?)
    }
}

// -----------------------------------------------------------------------------
// Structured

/// Static access to a struct's member table.
///
/// Implemented by the derive macro alongside [`Members`]; the base link in
/// a [`StructSchema`] uses this to reach the base type's schema without an
/// instance.
pub trait Structured: Members {
    /// Returns the static member table of `Self`.
    fn struct_schema() -> &'static StructSchema;
}
