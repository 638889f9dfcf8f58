//! Closed tables of recognized item values.
//!
//! Decoding never rejects an unrecognized value: [`Known`] keeps the raw
//! number around so newer items still round-trip, and the validator turns
//! them into warnings.

use std::fmt;

/// A value that is either one of a closed set of named constants or an
/// unrecognized raw number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Known<T> {
    /// A recognized constant
    Known(T),
    /// A structurally valid but unrecognized value
    Unrecognized(u32),
}

impl<T> Known<T> {
    /// Returns true if the value is recognized
    pub fn is_known(&self) -> bool {
        matches!(self, Known::Known(_))
    }
}

impl<T: fmt::Display> fmt::Display for Known<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Known::Known(value) => value.fmt(f),
            Known::Unrecognized(raw) => write!(f, "unknown ({})", raw),
        }
    }
}

macro_rules! value_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every recognized value, in table order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Looks up a raw value
            pub fn from_u32(value: u32) -> Known<Self> {
                match value {
                    $($value => Known::Known($name::$variant),)+
                    other => Known::Unrecognized(other),
                }
            }

            /// The raw wire value
            pub fn as_u32(self) -> u32 {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Human-readable name
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

value_table! {
    /// Item definition indices for weapons, knives and gloves
    Weapon {
        Deagle = 1 => "Desert Eagle",
        Elite = 2 => "Dual Berettas",
        FiveSeven = 3 => "Five-SeveN",
        Glock = 4 => "Glock-18",
        Ak47 = 7 => "AK-47",
        Aug = 8 => "AUG",
        Awp = 9 => "AWP",
        Famas = 10 => "FAMAS",
        G3sg1 = 11 => "G3SG1",
        GalilAr = 13 => "Galil AR",
        M249 = 14 => "M249",
        M4a4 = 16 => "M4A4",
        Mac10 = 17 => "MAC-10",
        P90 = 19 => "P90",
        Mp5sd = 23 => "MP5-SD",
        Ump45 = 24 => "UMP-45",
        Xm1014 = 25 => "XM1014",
        Bizon = 26 => "PP-Bizon",
        Mag7 = 27 => "MAG-7",
        Negev = 28 => "Negev",
        SawedOff = 29 => "Sawed-Off",
        Tec9 = 30 => "Tec-9",
        Zeus = 31 => "Zeus x27",
        P2000 = 32 => "P2000",
        Mp7 = 33 => "MP7",
        Mp9 = 34 => "MP9",
        Nova = 35 => "Nova",
        P250 = 36 => "P250",
        Scar20 = 38 => "SCAR-20",
        Sg553 = 39 => "SG 553",
        Ssg08 = 40 => "SSG 08",
        M4a1s = 60 => "M4A1-S",
        UspS = 61 => "USP-S",
        Cz75 = 63 => "CZ75-Auto",
        Revolver = 64 => "R8 Revolver",
        Bayonet = 500 => "Bayonet",
        ClassicKnife = 503 => "Classic Knife",
        FlipKnife = 505 => "Flip Knife",
        GutKnife = 506 => "Gut Knife",
        Karambit = 507 => "Karambit",
        M9Bayonet = 508 => "M9 Bayonet",
        HuntsmanKnife = 509 => "Huntsman Knife",
        FalchionKnife = 512 => "Falchion Knife",
        BowieKnife = 514 => "Bowie Knife",
        ButterflyKnife = 515 => "Butterfly Knife",
        ShadowDaggers = 516 => "Shadow Daggers",
        ParacordKnife = 517 => "Paracord Knife",
        SurvivalKnife = 518 => "Survival Knife",
        UrsusKnife = 519 => "Ursus Knife",
        NavajaKnife = 520 => "Navaja Knife",
        NomadKnife = 521 => "Nomad Knife",
        StilettoKnife = 522 => "Stiletto Knife",
        TalonKnife = 523 => "Talon Knife",
        SkeletonKnife = 525 => "Skeleton Knife",
        KukriKnife = 526 => "Kukri Knife",
        BrokenFangGloves = 4725 => "Broken Fang Gloves",
        BloodhoundGloves = 5027 => "Bloodhound Gloves",
        SportGloves = 5030 => "Sport Gloves",
        DriverGloves = 5031 => "Driver Gloves",
        HandWraps = 5032 => "Hand Wraps",
        MotoGloves = 5033 => "Moto Gloves",
        SpecialistGloves = 5034 => "Specialist Gloves",
        HydraGloves = 5035 => "Hydra Gloves",
    }
}

value_table! {
    /// Item rarity tiers
    Rarity {
        Stock = 0 => "Stock",
        ConsumerGrade = 1 => "Consumer Grade",
        IndustrialGrade = 2 => "Industrial Grade",
        MilSpec = 3 => "Mil-Spec",
        Restricted = 4 => "Restricted",
        Classified = 5 => "Classified",
        Covert = 6 => "Covert",
        Contraband = 7 => "Contraband",
        Extraordinary = 99 => "Extraordinary",
    }
}

value_table! {
    /// Item quality tiers
    Quality {
        Normal = 0 => "Normal",
        Genuine = 1 => "Genuine",
        Vintage = 2 => "Vintage",
        Unusual = 3 => "Unusual",
        Unique = 4 => "Unique",
        Community = 5 => "Community",
        Developer = 6 => "Developer",
        SelfMade = 7 => "Self-Made",
        Customized = 8 => "Customized",
        Strange = 9 => "StatTrak",
        Completed = 10 => "Completed",
        Tournament = 12 => "Souvenir",
    }
}
