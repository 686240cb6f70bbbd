use crate::impls::impl_leaf_common;
use crate::{FromInspect, Inspect};

impl Inspect for String {
    impl_leaf_common!();
}

impl FromInspect for String {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}
