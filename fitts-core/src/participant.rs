use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Please enter a Participant ID.")]
    MissingParticipantId,
    #[error("You must agree to participate to proceed.")]
    ConsentNotGiven,
    #[error("unknown device `{0}` (expected one of: mouse, touchpad, trackball, stylus, touchscreen)")]
    UnknownDevice(String),
}

/// Pointing device the participant uses for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mouse,
    Touchpad,
    Trackball,
    Stylus,
    Touchscreen,
}

impl Device {
    pub const ALL: [Device; 5] = [
        Device::Mouse,
        Device::Touchpad,
        Device::Trackball,
        Device::Stylus,
        Device::Touchscreen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mouse => "mouse",
            Device::Touchpad => "touchpad",
            Device::Trackball => "trackball",
            Device::Stylus => "stylus",
            Device::Touchscreen => "touchscreen",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Device::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EntryError::UnknownDevice(wanted.to_string()))
    }
}

/// Raw values from the consent/entry form, before validation.
#[derive(Debug, Clone, Default)]
pub struct ParticipantEntry {
    pub participant_id: String,
    pub device: String,
    pub consent: bool,
}

impl ParticipantEntry {
    pub fn validate(&self) -> Result<Participant, EntryError> {
        let id = self.participant_id.trim();
        if id.is_empty() {
            return Err(EntryError::MissingParticipantId);
        }
        if !self.consent {
            return Err(EntryError::ConsentNotGiven);
        }
        let device = self.device.parse()?;
        Ok(Participant {
            id: id.to_string(),
            device,
        })
    }
}

/// A validated participant; the only way to obtain one is [`ParticipantEntry::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: String,
    device: Device,
}

impl Participant {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn device(&self) -> Device {
        self.device
    }
}
