//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays interactions per `(port, method)` pair, oldest first.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    replayed: usize,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, replayed: 0 }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was recorded for the pair or every
    /// recorded interaction has already been served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let Some(queue) = self.queues.get_mut(&(port.to_string(), method.to_string())) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(format!(
                "Cassette has no interactions for {port}::{method}. Available: [{}]",
                available.join(", ")
            ));
        };

        let interaction = queue.pop_front().ok_or_else(|| {
            format!("Cassette exhausted: every {port}::{method} interaction has been replayed")
        })?;
        self.replayed += 1;
        Ok(interaction)
    }

    /// Number of interactions served so far.
    #[must_use]
    pub fn replayed(&self) -> usize {
        self.replayed
    }
}
