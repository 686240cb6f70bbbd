use core::any::TypeId;

use hashbrown::Equivalent;

use crate::schema::StructSchema;
use crate::shape::TypeShape;
use crate::sync::SpinLock;
use crate::util;

// -----------------------------------------------------------------------------
// MemberRoute

/// The terminal member a route lands on, by index into the owning schema's
/// field or property table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A stored field; readable and writable in place.
    Field(usize),
    /// A computed property; read produces an owned value, write goes
    /// through the setter (if any).
    Property(usize),
}

/// A resolved member descriptor: the base-link hops to walk from the
/// starting type, then the terminal member.
///
/// Routes are immutable once cached and shared by every caller resolving
/// the same (type, name) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberRoute {
    hops: Box<[usize]>,
    member: MemberKind,
}

impl MemberRoute {
    /// Returns the base-field hops leading to the member's owning schema.
    /// Empty for members declared on the starting type itself.
    #[inline]
    pub fn hops(&self) -> &[usize] {
        &self.hops
    }

    /// Returns the terminal member.
    #[inline]
    pub const fn member(&self) -> MemberKind {
        self.member
    }

    /// Returns the schema the terminal member lives on, starting the hop
    /// walk from `schema`.
    pub fn target_schema(&self, schema: &'static StructSchema) -> &'static StructSchema {
        let mut cur = schema;
        for _ in self.hops.iter() {
            match cur.base() {
                Some(base) => cur = base.schema(),
                None => break,
            }
        }
        cur
    }

    /// Returns the declared [`TypeShape`] of the terminal member.
    pub fn declared(&self, schema: &'static StructSchema) -> TypeShape {
        let target = self.target_schema(schema);
        match self.member {
            MemberKind::Field(i) => target.fields()[i].shape(),
            MemberKind::Property(i) => target.properties()[i].shape(),
        }
    }

    /// Returns `true` if the terminal member can be written.
    pub fn writable(&self, schema: &'static StructSchema) -> bool {
        let target = self.target_schema(schema);
        match self.member {
            MemberKind::Field(_) => true,
            MemberKind::Property(i) => target.properties()[i].writable(),
        }
    }
}

// -----------------------------------------------------------------------------
// Cache key

#[derive(PartialEq, Eq, Hash)]
struct MemberKey {
    owner: TypeId,
    name: Box<str>,
}

/// Borrowed lookup key; hashes identically to [`MemberKey`].
#[derive(PartialEq, Eq, Hash)]
struct MemberKeyRef<'a> {
    owner: TypeId,
    name: &'a str,
}

impl Equivalent<MemberKey> for MemberKeyRef<'_> {
    #[inline]
    fn equivalent(&self, key: &MemberKey) -> bool {
        self.owner == key.owner && self.name == &*key.name
    }
}

// -----------------------------------------------------------------------------
// MemberCache

/// Process-wide cache mapping (owner type, member name) to the resolved
/// [`MemberRoute`], amortizing the schema-chain walk.
///
/// Resolutions are cached per exact starting type, not per type in the
/// walked chain: two different subtypes may resolve the same name
/// differently when one shadows it.
///
/// # Examples
///
/// ```
/// use glint_inspect::cache::MemberCache;
/// use glint_inspect::{derive::Inspect, ops::Structured, shape::TypeShape};
///
/// #[derive(Inspect, Clone)]
/// struct Foo {
///     hp: u32,
/// }
///
/// let cache = MemberCache::new();
/// let route = cache
///     .resolve(TypeShape::of::<Foo>(), Foo::struct_schema(), "hp", false)
///     .unwrap();
/// assert!(route.hops().is_empty());
/// ```
pub struct MemberCache {
    map: SpinLock<util::HashMap<MemberKey, Option<MemberRoute>>>,
}

impl MemberCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            map: SpinLock::new(util::HashMap::with_hasher(util::FixedHashState)),
        }
    }

    /// Resolves `name` against `schema`, walking the base chain.
    ///
    /// Lookup order at each level: fields first (exact name match), then
    /// properties (ASCII case-insensitive permitted); the first match wins,
    /// so a subtype member shadows a base member of the same name.
    ///
    /// Successful resolutions are always cached. Unsuccessful ones are
    /// cached only when `remember_missing` is set; high-frequency callers
    /// probing for optional members want that; one-shot lookups don't need
    /// the entry.
    pub fn resolve(
        &self,
        owner: TypeShape,
        schema: &'static StructSchema,
        name: &str,
        remember_missing: bool,
    ) -> Option<MemberRoute> {
        let key = MemberKeyRef {
            owner: owner.id(),
            name,
        };
        if let Some(cached) = self.map.lock().get(&key) {
            return cached.clone();
        }

        let route = Self::resolve_uncached(schema, name);
        if route.is_some() || remember_missing {
            self.map.lock().insert(
                MemberKey {
                    owner: owner.id(),
                    name: name.into(),
                },
                route.clone(),
            );
        }
        route
    }

    fn resolve_uncached(schema: &'static StructSchema, name: &str) -> Option<MemberRoute> {
        let mut hops = Vec::new();
        let mut cur = schema;
        loop {
            if let Some(index) = cur.field_index(name) {
                return Some(MemberRoute {
                    hops: hops.into_boxed_slice(),
                    member: MemberKind::Field(index),
                });
            }
            if let Some(index) = cur.property_index(name) {
                return Some(MemberRoute {
                    hops: hops.into_boxed_slice(),
                    member: MemberKind::Property(index),
                });
            }
            let base = cur.base()?;
            hops.push(base.field());
            cur = base.schema();
        }
    }

    /// Drops every cached entry.
    ///
    /// This is the reset checkpoint for "the set of introspectable types
    /// changed"; entries are rebuilt lazily afterwards.
    pub fn clear(&self) {
        self.map.lock().clear();
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemberCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{MemberCache, MemberKind};
    use crate::schema::{BaseLink, FieldSchema, PropertySchema, StructSchema};
    use crate::shape::TypeShape;

    struct BaseMarker;
    struct DerivedMarker;

    fn base_schema() -> &'static StructSchema {
        static FIELDS: &[FieldSchema] = &[
            FieldSchema::new("hp", TypeShape::of::<u32>),
            FieldSchema::new("name", TypeShape::of::<String>),
        ];
        static PROPS: &[PropertySchema] =
            &[PropertySchema::new("Ratio", TypeShape::of::<f32>, false)];
        static SCHEMA: StructSchema = StructSchema::new("Base", FIELDS, PROPS, None);
        &SCHEMA
    }

    fn derived_schema() -> &'static StructSchema {
        static FIELDS: &[FieldSchema] = &[
            FieldSchema::new("base", TypeShape::of::<u8>),
            FieldSchema::new("hp", TypeShape::of::<i64>),
        ];
        static SCHEMA: StructSchema = StructSchema::new(
            "Derived",
            FIELDS,
            &[],
            Some(BaseLink::new(0, base_schema)),
        );
        &SCHEMA
    }

    #[test]
    fn fields_resolve_before_properties() {
        let cache = MemberCache::new();
        let route = cache
            .resolve(TypeShape::of::<BaseMarker>(), base_schema(), "hp", false)
            .unwrap();
        assert_eq!(route.member(), MemberKind::Field(0));
        assert!(route.hops().is_empty());
    }

    #[test]
    fn shadowing_prefers_the_starting_type() {
        let cache = MemberCache::new();
        let route = cache
            .resolve(
                TypeShape::of::<DerivedMarker>(),
                derived_schema(),
                "hp",
                false,
            )
            .unwrap();
        // Derived's own `hp`, not Base's.
        assert_eq!(route.member(), MemberKind::Field(1));
        assert!(route.hops().is_empty());
        assert!(route.declared(derived_schema()).is::<i64>());
    }

    #[test]
    fn base_members_resolve_through_hops() {
        let cache = MemberCache::new();
        let route = cache
            .resolve(
                TypeShape::of::<DerivedMarker>(),
                derived_schema(),
                "name",
                false,
            )
            .unwrap();
        assert_eq!(route.hops(), &[0]);
        assert_eq!(route.member(), MemberKind::Field(1));
        assert!(route.declared(derived_schema()).is::<String>());
    }

    #[test]
    fn properties_match_case_insensitively_fields_do_not() {
        let cache = MemberCache::new();
        let shape = TypeShape::of::<BaseMarker>();
        let route = cache.resolve(shape, base_schema(), "ratio", false).unwrap();
        assert_eq!(route.member(), MemberKind::Property(0));

        // `HP` must not match the `hp` field.
        assert!(cache.resolve(shape, base_schema(), "HP", false).is_none());
    }

    #[test]
    fn missing_entries_are_cached_on_request() {
        let cache = MemberCache::new();
        let shape = TypeShape::of::<BaseMarker>();

        assert!(cache.resolve(shape, base_schema(), "nope", false).is_none());
        assert_eq!(cache.len(), 0);

        assert!(cache.resolve(shape, base_schema(), "nope", true).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
