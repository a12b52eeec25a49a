/// Declare a UUID-backed identifier newtype.
///
/// The generated type serializes as a bare UUID string, displays in the
/// eight-character short form, and parses from the full hyphenated form.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $crate::Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self($crate::Uuid::new_v4())
            }

            /// The full hyphenated form, as stored in row keys.
            pub fn key(&self) -> String {
                self.0.to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", &self.0.to_string()[..8])
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of an investigator row.
    CharacterId
);

define_id!(
    /// Identifier of an authenticated profile.
    UserId
);
