use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub code: String,
    pub name: String,
}

/// The four filter groups offered by the API, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCatalog {
    #[serde(default)]
    pub employment_codes: Vec<FilterOption>,
    #[serde(default)]
    pub age_groups: Vec<FilterOption>,
    #[serde(default)]
    pub earnings_brackets: Vec<FilterOption>,
    #[serde(default)]
    pub education_levels: Vec<FilterOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    Employment,
    Age,
    Earnings,
    Education,
}

impl FilterGroup {
    /// Lookup priority used when resolving codes to labels.
    pub const ALL: [FilterGroup; 4] = [
        FilterGroup::Employment,
        FilterGroup::Age,
        FilterGroup::Earnings,
        FilterGroup::Education,
    ];

    /// Query parameter name understood by the filtered block-group endpoint.
    pub fn param(&self) -> &'static str {
        match self {
            FilterGroup::Employment => "employment_code",
            FilterGroup::Age => "age_group",
            FilterGroup::Earnings => "earnings_bracket",
            FilterGroup::Education => "education_level",
        }
    }
}

impl FilterCatalog {
    pub fn options(&self, group: FilterGroup) -> &[FilterOption] {
        match group {
            FilterGroup::Employment => &self.employment_codes,
            FilterGroup::Age => &self.age_groups,
            FilterGroup::Earnings => &self.earnings_brackets,
            FilterGroup::Education => &self.education_levels,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterGroup::ALL
            .iter()
            .all(|group| self.options(*group).is_empty())
    }
}

/// At most one chosen code per group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilterSelection {
    pub employment_code: Option<String>,
    pub age_group: Option<String>,
    pub earnings_bracket: Option<String>,
    pub education_level: Option<String>,
}

impl ActiveFilterSelection {
    pub fn get(&self, group: FilterGroup) -> Option<&str> {
        let value = match group {
            FilterGroup::Employment => &self.employment_code,
            FilterGroup::Age => &self.age_group,
            FilterGroup::Earnings => &self.earnings_bracket,
            FilterGroup::Education => &self.education_level,
        };
        // An empty <select> value means "any"
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// `(param, code)` pairs for the groups that carry a selection, in group order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        FilterGroup::ALL
            .iter()
            .filter_map(|group| self.get(*group).map(|code| (group.param(), code)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn clear(&mut self) {
        *self = ActiveFilterSelection::default();
    }
}
