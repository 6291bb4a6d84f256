use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Nombre de minutes dans une journée.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("invalid time of day {0:?}: expected HH:MM")]
    Malformed(String),
    #[error("time of day out of range: {0} minutes")]
    OutOfRange(u32),
}

/// `"HH:MM"` → minutes depuis minuit.
///
/// Deux champs décimaux de deux chiffres, heures dans [0,23], minutes dans [0,59].
pub fn to_minutes(hhmm: &str) -> Result<u32, ClockError> {
    let malformed = || ClockError::Malformed(hhmm.to_string());
    let (h, m) = hhmm.split_once(':').ok_or_else(malformed)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(malformed());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let h: u32 = h.parse().map_err(|_| malformed())?;
    let m: u32 = m.parse().map_err(|_| malformed())?;
    if h > 23 || m > 59 {
        return Err(malformed());
    }
    Ok(h * 60 + m)
}

/// Minutes depuis minuit → `"HH:MM"` (zéro-padding sur les deux champs).
pub fn to_hhmm(mins: u32) -> String {
    format!("{:02}:{:02}", mins / 60, mins % 60)
}

/// Heure de la journée, stockée en minutes depuis minuit, sérialisée en `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub fn from_minutes(mins: u32) -> Result<Self, ClockError> {
        if mins >= MINUTES_PER_DAY {
            return Err(ClockError::OutOfRange(mins));
        }
        Ok(Self(mins))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_minutes(s.trim()).map(Self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hhmm(self.0))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
