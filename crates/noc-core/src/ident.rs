macro_rules! identifier {
    ($name: ident, $inner: ty) => {
        #[allow(missing_docs)]
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Display,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name($inner);

        impl $name {
            /// Creates a new identifier.
            pub const fn new(val: $inner) -> Self {
                Self(val)
            }

            /// Returns the inner representation of the identifier.
            pub const fn inner(self) -> $inner {
                self.0
            }
        }
    };
}
