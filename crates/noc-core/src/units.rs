#![allow(missing_docs)]
//! Units used throughout the selector/router: bandwidths and distances.

macro_rules! unit {
    ($name: ident) => {
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
            derive_more::Add,
            derive_more::Sub,
            derive_more::Sum,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const ZERO: $name = Self::new(0);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn into_u64(self) -> u64 {
                self.0
            }

            pub const fn into_f64(self) -> f64 {
                self.0 as f64
            }
        }

        impl From<$name> for f64 {
            fn from(val: $name) -> Self {
                val.into_f64()
            }
        }
    };
}

unit!(BytesPerSec);

impl BytesPerSec {
    /// Rounds `self` up to the nearest non-zero multiple of `quantum`, the NoC's per-port
    /// bandwidth granularity.
    pub fn round_up_to(self, quantum: BytesPerSec) -> BytesPerSec {
        if quantum.0 == 0 || self.0 == 0 {
            return self;
        }
        let rem = self.0 % quantum.0;
        if rem == 0 {
            self
        } else {
            BytesPerSec::new(self.0 + (quantum.0 - rem))
        }
    }
}

impl std::fmt::Display for BytesPerSec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}B/s", self.0)
    }
}

unit!(Distance);

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
