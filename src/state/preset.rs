//! Named preset durations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Preset durations offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Preset {
    pub fn minutes(&self) -> u32 {
        match self {
            Preset::Pomodoro => 25,
            Preset::ShortBreak => 5,
            Preset::LongBreak => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Pomodoro => "pomodoro",
            Preset::ShortBreak => "short-break",
            Preset::LongBreak => "long-break",
        }
    }

    /// Find the named preset with this duration, if any
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        [Preset::Pomodoro, Preset::ShortBreak, Preset::LongBreak]
            .into_iter()
            .find(|preset| preset.minutes() == minutes)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" => Ok(Preset::Pomodoro),
            "short-break" | "short_break" | "shortBreak" => Ok(Preset::ShortBreak),
            "long-break" | "long_break" | "longBreak" => Ok(Preset::LongBreak),
            other => Err(TimerError::UnknownPreset(other.to_string())),
        }
    }
}

/// What a preset command asks for: a named preset or a custom duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSelection {
    Named(Preset),
    Minutes(u32),
}

impl PresetSelection {
    pub fn minutes(&self) -> u32 {
        match self {
            PresetSelection::Named(preset) => preset.minutes(),
            PresetSelection::Minutes(minutes) => *minutes,
        }
    }

    /// Label used for last-action tracking
    pub fn label(&self) -> String {
        match self {
            PresetSelection::Named(preset) => preset.to_string(),
            PresetSelection::Minutes(minutes) => format!("{}min", minutes),
        }
    }
}

impl From<Preset> for PresetSelection {
    fn from(preset: Preset) -> Self {
        PresetSelection::Named(preset)
    }
}

impl FromStr for PresetSelection {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(preset) = s.parse::<Preset>() {
            return Ok(PresetSelection::Named(preset));
        }
        s.parse::<u32>()
            .map(PresetSelection::Minutes)
            .map_err(|_| TimerError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_minutes() {
        assert_eq!(Preset::Pomodoro.minutes(), 25);
        assert_eq!(Preset::ShortBreak.minutes(), 5);
        assert_eq!(Preset::LongBreak.minutes(), 10);
    }

    #[test]
    fn test_parse_named_presets() {
        assert_eq!("pomodoro".parse::<Preset>().unwrap(), Preset::Pomodoro);
        assert_eq!("short-break".parse::<Preset>().unwrap(), Preset::ShortBreak);
        assert_eq!("shortBreak".parse::<Preset>().unwrap(), Preset::ShortBreak);
        assert_eq!("long_break".parse::<Preset>().unwrap(), Preset::LongBreak);
        assert!(matches!(
            "coffee".parse::<Preset>(),
            Err(TimerError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            "long-break".parse::<PresetSelection>().unwrap(),
            PresetSelection::Named(Preset::LongBreak)
        );
        assert_eq!(
            "45".parse::<PresetSelection>().unwrap(),
            PresetSelection::Minutes(45)
        );
        assert!("-5".parse::<PresetSelection>().is_err());
        assert!("soon".parse::<PresetSelection>().is_err());
    }

    #[test]
    fn test_from_minutes() {
        assert_eq!(Preset::from_minutes(5), Some(Preset::ShortBreak));
        assert_eq!(Preset::from_minutes(7), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Preset::ShortBreak).unwrap();
        assert_eq!(json, "\"short-break\"");
    }
}
