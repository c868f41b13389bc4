//!
//! # Directive Keywords
//!
//! Defines the [keywords] macro and paired [Keyword] trait,
//! mapping the fixed vocabulary of the pin-placement directive language
//! (annotation names, direction tokens, side labels) to and from their spellings.
//!

///
/// # Keyword Trait
///
/// * `to_str(&self) -> &'static str` produces the keyword's directive spelling.
/// * `from_str(&str) -> Option<Self>` does the opposite, returning `None` for unknown spellings.
///
pub trait Keyword: std::marker::Sized {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
}

///
/// # Keyword-Enum Macro
///
/// Creates a fieldless `enum` paired with its directive spellings,
/// implementing [Keyword] and [std::fmt::Display].
///
/// ```rs
/// keywords!(
/// /// # Side Labels
/// Dir {
///     N: "N",
///     E: "E",
///  }
/// );
/// ```
///
#[macro_export]
macro_rules! keywords {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(::serde::Deserialize, ::serde::Serialize, ::schemars::JsonSchema)]
        pub enum $enum_name {
            $( #[doc=$strval]
               #[serde(rename=$strval)]
               $variant ),*
        }
        impl $enum_name {
            /// All variants, in declaration order
            pub const ALL: &'static [$enum_name] = &[ $( $enum_name::$variant ),* ];
        }
        impl $crate::keywords::Keyword for $enum_name {
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Case-sensitive lookup of directive spelling `txt`
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", $crate::keywords::Keyword::to_str(self))
            }
        }
    }
}

keywords!(
    /// # Annotation Names
    /// The `name` in `@name` and `@name=value`.
    Annotation {
        MinDistance: "min_distance",
        BusMajor: "bus_major",
        BitMajor: "bit_major",
    }
);
impl Annotation {
    /// Boolean indication of whether the annotation requires an `=value`.
    /// All others must *not* carry one.
    pub fn takes_value(&self) -> bool {
        matches!(self, Self::MinDistance)
    }
}

keywords!(
    /// # Direction Tokens
    /// Everything accepted after a `#`.
    DirToken {
        N: "N",
        E: "E",
        W: "W",
        S: "S",
        NR: "NR",
        ER: "ER",
        WR: "WR",
        SR: "SR",
        BusSort: "BUS_SORT",
    }
);
impl DirToken {
    /// Split into the selected side and its reversal flag.
    /// Returns `None` for `BUS_SORT`, which selects no side.
    pub fn side(&self) -> Option<(Dir, bool)> {
        use Dir::*;
        match self {
            Self::N => Some((N, false)),
            Self::E => Some((E, false)),
            Self::W => Some((W, false)),
            Self::S => Some((S, false)),
            Self::NR => Some((N, true)),
            Self::ER => Some((E, true)),
            Self::WR => Some((W, true)),
            Self::SR => Some((S, true)),
            Self::BusSort => None,
        }
    }
}

keywords!(
    /// # Side Labels
    /// The four cardinal sides of the package, in canonical order.
    Dir {
        N: "N",
        E: "E",
        W: "W",
        S: "S",
    }
);
impl Dir {
    /// Position in the canonical N, E, W, S ordering
    pub fn index(&self) -> usize {
        match self {
            Self::N => 0,
            Self::E => 1,
            Self::W => 2,
            Self::S => 3,
        }
    }
    /// Directive token selecting this side, reversed or not
    pub fn token(&self, reverse: bool) -> DirToken {
        match (self, reverse) {
            (Self::N, false) => DirToken::N,
            (Self::E, false) => DirToken::E,
            (Self::W, false) => DirToken::W,
            (Self::S, false) => DirToken::S,
            (Self::N, true) => DirToken::NR,
            (Self::E, true) => DirToken::ER,
            (Self::W, true) => DirToken::WR,
            (Self::S, true) => DirToken::SR,
        }
    }
}
