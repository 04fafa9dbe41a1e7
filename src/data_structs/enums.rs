use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::ProfileError;

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
pub enum Strand {
    /// Forward strand.
    Forward,
    /// Reverse strand.
    Reverse,
    /// No strand. Treated as forward during extraction.
    #[default]
    None,
}

impl Strand {
    /// Whether fragments on this strand are read back to front.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl FromStr for Strand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Ok(Strand::None),
        }
    }
}

impl From<Option<bio::bio_types::strand::Strand>> for Strand {
    fn from(value: Option<bio::bio_types::strand::Strand>) -> Self {
        match value {
            Some(bio::bio_types::strand::Strand::Forward) => Strand::Forward,
            Some(bio::bio_types::strand::Strand::Reverse) => Strand::Reverse,
            Some(bio::bio_types::strand::Strand::Unknown) | None => Strand::None,
        }
    }
}

impl From<Strand> for char {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalization applied to a whole flat signal after smoothing.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default)]
pub enum NormalizeMode {
    #[default]
    None,
    /// Subtract the mean, divide by the population standard deviation.
    Center,
    /// Min-max remap onto `[0, 1]`.
    Remap,
}

impl FromStr for NormalizeMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(NormalizeMode::None),
            "center" => Ok(NormalizeMode::Center),
            "remap" => Ok(NormalizeMode::Remap),
            other => {
                Err(ProfileError::invalid_parameter(format!(
                    "unknown normalize mode '{other}', expected one of none, \
                     center, remap"
                )))
            },
        }
    }
}

impl Display for NormalizeMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            NormalizeMode::None => write!(f, "none"),
            NormalizeMode::Center => write!(f, "center"),
            NormalizeMode::Remap => write!(f, "remap"),
        }
    }
}

/// Moving-average flavour used when smoothing is requested.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default)]
pub enum SmoothingKind {
    /// Single centered pass.
    #[default]
    Single,
    /// Mean of a forward pass and a pass over the reversed signal.
    Symmetric,
}

impl FromStr for SmoothingKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(SmoothingKind::Single),
            "symmetric" => Ok(SmoothingKind::Symmetric),
            other => {
                Err(ProfileError::invalid_parameter(format!(
                    "unknown smoothing kind '{other}', expected single or \
                     symmetric"
                )))
            },
        }
    }
}

impl Display for SmoothingKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            SmoothingKind::Single => write!(f, "single"),
            SmoothingKind::Symmetric => write!(f, "symmetric"),
        }
    }
}

macro_rules! string_serde {
    ($ty: ty) => {
        impl Serialize for $ty {
            fn serialize<S>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer, {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>, {
                let s = String::deserialize(deserializer)?;
                std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(NormalizeMode);
string_serde!(SmoothingKind);
