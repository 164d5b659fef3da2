use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Tracks which subject a view last fetched for. A fetch is due on the first
/// activation and whenever the identity key changes; a terminal phase is
/// never left otherwise.
#[derive(Debug, Default)]
pub struct Lifecycle<K> {
    phase: LoadPhase,
    identity: Option<K>,
}

impl<K: PartialEq> Lifecycle<K> {
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Returns true and moves to `Loading` when a fetch must start.
    pub fn activate(&mut self, identity: K) -> bool {
        let changed = self.identity.as_ref() != Some(&identity);
        if self.phase != LoadPhase::Idle && !changed {
            return false;
        }
        self.identity = Some(identity);
        self.phase = LoadPhase::Loading;
        true
    }

    pub fn finish(&mut self, ok: bool) {
        if self.phase == LoadPhase::Loading {
            self.phase = if ok {
                LoadPhase::Loaded
            } else {
                LoadPhase::Failed
            };
        }
    }
}
