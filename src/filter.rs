// Filter selection for querying tasks

use crate::models::{Category, Task};
use eyre::eyre;
use std::str::FromStr;

/// Criterion selecting which tasks are displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Category(Category),
}

impl Filter {
    /// Every selectable filter, in the order they are offered to the user
    pub fn choices() -> impl Iterator<Item = Filter> {
        [Filter::All, Filter::Active, Filter::Completed]
            .into_iter()
            .chain(Category::ALL.into_iter().map(Filter::Category))
    }

    /// Whether a task is selected by this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
            Filter::Category(category) => task.category == *category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
            Filter::Category(category) => category.label(),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Active => write!(f, "active"),
            Filter::Completed => write!(f, "completed"),
            Filter::Category(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for Filter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => other.parse::<Category>().map(Filter::Category).map_err(|_| {
                eyre!(
                    "Unknown filter '{}' (expected all, active, completed, or a category)",
                    s.trim()
                )
            }),
        }
    }
}

// Serialized as the token the user types (`all`, `work`, ...)
impl serde::Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <String as serde::Deserialize>::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Category> for Filter {
    fn from(category: Category) -> Self {
        Filter::Category(category)
    }
}
