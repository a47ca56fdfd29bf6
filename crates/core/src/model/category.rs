use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category {id} has an empty display name")]
    EmptyDisplayName { id: CategoryId },
}

/// Unvalidated category as it appears in content files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub id: CategoryId,
    pub display_name: String,
    #[serde(default)]
    pub unlock_threshold: u32,
}

impl CategoryDraft {
    /// Validate the draft into a `Category`.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyDisplayName` if the name is blank.
    pub fn validate(self) -> Result<Category, CategoryError> {
        let display_name = self.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(CategoryError::EmptyDisplayName { id: self.id });
        }
        Ok(Category {
            id: self.id,
            display_name,
            unlock_threshold: self.unlock_threshold,
        })
    }
}

/// A quiz topic that becomes playable once the player has enough points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: CategoryId,
    display_name: String,
    unlock_threshold: u32,
}

impl Category {
    #[must_use]
    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn unlock_threshold(&self) -> u32 {
        self.unlock_threshold
    }

    /// A category is unlocked once cumulative points reach its threshold.
    #[must_use]
    pub fn is_unlocked_at(&self, cumulative_points: u32) -> bool {
        cumulative_points >= self.unlock_threshold
    }
}
