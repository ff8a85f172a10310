//! What to do when two units target the same path.

use serde::{Deserialize, Serialize};

use crate::core::error::{DecomposeError, Result};
use crate::core::plan::{Collision, Plan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Write every unit in order; the last writer of a path wins.
    #[default]
    LastWriteWins,
    /// Fail before anything is written.
    Reject,
}

impl ConflictPolicy {
    /// Check `plan` against the policy, returning the collisions it tolerates.
    pub fn check(self, plan: &Plan) -> Result<Vec<Collision>> {
        let collisions = plan.collisions();
        match (self, collisions.first()) {
            (ConflictPolicy::Reject, Some(collision)) => Err(DecomposeError::Collision {
                path: collision.path.clone(),
                first: collision.writers[0].to_string(),
                second: collision.writers[1].to_string(),
            }),
            _ => Ok(collisions),
        }
    }
}
