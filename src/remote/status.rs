//! Remote return-code decoding
//!
//! A remote call returns 0 on success; any other value is a bitmask of
//! independent [`ErrorFlag`]s. Bits with no matching flag are ignored.

use serde::Serialize;
use std::fmt;

use crate::error::{Result, SimError};

/// Single error bit of a remote return code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorFlag {
    NoValue,
    Timeout,
    IllegalOpmode,
    ServerError,
    SplitProgress,
    LocalError,
    InitError,
}

impl ErrorFlag {
    /// Every flag, ascending by weight
    pub const ALL: [ErrorFlag; 7] = [
        ErrorFlag::NoValue,
        ErrorFlag::Timeout,
        ErrorFlag::IllegalOpmode,
        ErrorFlag::ServerError,
        ErrorFlag::SplitProgress,
        ErrorFlag::LocalError,
        ErrorFlag::InitError,
    ];

    /// Bit weight of this flag in a raw return code
    pub const fn weight(self) -> i32 {
        match self {
            ErrorFlag::NoValue => 1,
            ErrorFlag::Timeout => 2,
            ErrorFlag::IllegalOpmode => 4,
            ErrorFlag::ServerError => 8,
            ErrorFlag::SplitProgress => 16,
            ErrorFlag::LocalError => 32,
            ErrorFlag::InitError => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ErrorFlag::NoValue => "NO_VALUE",
            ErrorFlag::Timeout => "TIMEOUT",
            ErrorFlag::IllegalOpmode => "ILLEGAL_OPMODE",
            ErrorFlag::ServerError => "SERVER_ERROR",
            ErrorFlag::SplitProgress => "SPLIT_PROGRESS",
            ErrorFlag::LocalError => "LOCAL_ERROR",
            ErrorFlag::InitError => "INIT_ERROR",
        }
    }
}

impl fmt::Display for ErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flags decoded from one return code, ascending by weight
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorSet(Vec<ErrorFlag>);

impl ErrorSet {
    /// Empty set (success)
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, flag: ErrorFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = ErrorFlag> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ErrorFlag] {
        &self.0
    }

    /// Re-encode as a raw return code (known bits only)
    pub fn to_raw(&self) -> i32 {
        self.0.iter().fold(0, |acc, flag| acc | flag.weight())
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("success");
        }
        for (i, flag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(flag.name())?;
        }
        Ok(())
    }
}

impl IntoIterator for ErrorSet {
    type Item = ErrorFlag;
    type IntoIter = std::vec::IntoIter<ErrorFlag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decode a raw return code into its error flags
pub fn decode(raw: i32) -> ErrorSet {
    if raw == 0 {
        return ErrorSet::empty();
    }
    ErrorSet(
        ErrorFlag::ALL
            .iter()
            .copied()
            .filter(|flag| raw & flag.weight() != 0)
            .collect(),
    )
}

/// Turn a raw return code into a `Result`
pub fn check(raw: i32) -> Result<()> {
    if raw == 0 {
        Ok(())
    } else {
        Err(SimError::Remote {
            code: raw,
            errors: decode(raw),
        })
    }
}
