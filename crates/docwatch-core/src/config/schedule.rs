//! Per-category schedule configuration.

use serde::{Deserialize, Serialize};

use docwatch_entity::Category;

/// How the expiry window is expressed when querying the store.
///
/// Both modes select "expiry not null and expiry <= now + lookahead"; they
/// differ only in which repository query carries the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Ask the store for documents expiring within N days.
    DaysAhead,
    /// Compute `now + N days` and ask for documents expiring before it.
    BeforeDate,
}

/// Schedule and lookahead policy for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySchedule {
    /// Cron expression (sec min hour day-of-month month day-of-week, optional year), UTC.
    pub cron: String,
    /// Lookahead horizon in days.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
    /// Which repository query carries the horizon.
    #[serde(default = "default_query_mode")]
    pub query_mode: QueryMode,
}

/// Schedules for all categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Client documents.
    #[serde(default = "default_client")]
    pub client: CategorySchedule,
    /// Employee documents.
    #[serde(default = "default_employee")]
    pub employee: CategorySchedule,
    /// Company documents.
    #[serde(default = "default_company")]
    pub company: CategorySchedule,
}

impl ScheduleConfig {
    /// Schedule for the given category.
    pub fn for_category(&self, category: Category) -> &CategorySchedule {
        match category {
            Category::Client => &self.client,
            Category::Employee => &self.employee,
            Category::Company => &self.company,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            client: default_client(),
            employee: default_employee(),
            company: default_company(),
        }
    }
}

fn default_client() -> CategorySchedule {
    CategorySchedule {
        cron: "0 0 11 * * *".to_string(),
        lookahead_days: default_lookahead_days(),
        query_mode: QueryMode::DaysAhead,
    }
}

fn default_employee() -> CategorySchedule {
    CategorySchedule {
        cron: "0 0 11 * * *".to_string(),
        lookahead_days: default_lookahead_days(),
        query_mode: QueryMode::BeforeDate,
    }
}

fn default_company() -> CategorySchedule {
    CategorySchedule {
        cron: "0 0 12 * * *".to_string(),
        lookahead_days: default_lookahead_days(),
        query_mode: QueryMode::DaysAhead,
    }
}

fn default_lookahead_days() -> i64 {
    30
}

fn default_query_mode() -> QueryMode {
    QueryMode::DaysAhead
}
