use clap::Parser;
use fitts_core::ParticipantEntry;
use std::path::PathBuf;

/// Fitts's law target acquisition experiment
#[derive(Parser, Debug)]
#[command(name = "fitts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Participant identifier (embedded in the export file names)
    #[arg(short, long, default_value = "")]
    pub participant: String,

    /// Pointing device: mouse, touchpad, trackball, stylus or touchscreen
    #[arg(short, long, default_value = "mouse")]
    pub device: String,

    /// Confirm the participant agreed to take part
    #[arg(long)]
    pub consent: bool,

    /// Directory for the CSV and JSON exports
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Run in a 1280x800 window instead of borderless fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn entry(&self) -> ParticipantEntry {
        ParticipantEntry {
            participant_id: self.participant.clone(),
            device: self.device.clone(),
            consent: self.consent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitts_core::{Device, EntryError};

    #[test]
    fn full_entry_validates() {
        let cli = Cli::try_parse_from(["fitts", "-p", "P1", "--device", "trackball", "--consent"])
            .unwrap();
        let participant = cli.entry().validate().unwrap();
        assert_eq!(participant.id(), "P1");
        assert_eq!(participant.device(), Device::Trackball);
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert!(!cli.windowed);
    }

    #[test]
    fn missing_consent_blocks_start() {
        let cli = Cli::try_parse_from(["fitts", "--participant", "P1"]).unwrap();
        assert_eq!(cli.entry().validate(), Err(EntryError::ConsentNotGiven));
    }

    #[test]
    fn missing_participant_blocks_start() {
        let cli = Cli::try_parse_from(["fitts", "--consent"]).unwrap();
        assert_eq!(
            cli.entry().validate(),
            Err(EntryError::MissingParticipantId)
        );
    }
}
