use std::fmt;

/// Everything the display surface shows; nothing reads it back.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStatus {
    pub participant_id: String,
    pub device: String,
    pub block: usize,
    pub blocks: usize,
    pub trial: usize,
    pub trials_per_block: usize,
    pub index_of_difficulty: Option<f64>,
    pub completed: usize,
    pub total: usize,
    pub errors: usize,
    pub banner: String,
}

impl DisplayStatus {
    pub fn progress(&self) -> String {
        format!("{}/{}", self.completed, self.total)
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) | Block {} | Trial {} | ID ",
            self.participant_id, self.device, self.block, self.trial
        )?;
        match self.index_of_difficulty {
            Some(id) => write!(f, "{id:.3}")?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            " | {} | Errors {} | {}",
            self.progress(),
            self.errors,
            self.banner
        )
    }
}

pub fn progress_banner(block: usize, blocks: usize, trial: usize, trials_per_block: usize) -> String {
    format!("Block {block}/{blocks} · Trial {trial}/{trials_per_block}")
}

pub fn feedback_banner(hit: bool, movement_time_ms: f64) -> String {
    let outcome = if hit { "Hit" } else { "Miss" };
    format!("{outcome} · {movement_time_ms:.1} ms")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line() {
        let status = DisplayStatus {
            participant_id: "P1".into(),
            device: "mouse".into(),
            block: 2,
            blocks: 10,
            trial: 5,
            trials_per_block: 32,
            index_of_difficulty: Some(6f64.log2()),
            completed: 36,
            total: 320,
            errors: 3,
            banner: feedback_banner(false, 412.345),
        };
        assert_eq!(
            status.to_string(),
            "P1 (mouse) | Block 2 | Trial 5 | ID 2.585 | 36/320 | Errors 3 | Miss · 412.3 ms"
        );
    }

    #[test]
    fn banners() {
        assert_eq!(progress_banner(1, 10, 1, 32), "Block 1/10 · Trial 1/32");
        assert_eq!(feedback_banner(true, 250.0), "Hit · 250.0 ms");
    }
}
