//! Catalog filter and sort.
//!
//! Both passes are pure and stable: the relative catalog order of templates
//! is kept wherever the filter or sort key does not distinguish them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{ChecklistType, Difficulty, Template};

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Filter specification. Every field is optional; `None` places no
/// constraint on that dimension. Supplied fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFilter {
    /// Case-insensitive substring over name, description and tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_type: Option<ChecklistType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_official: Option<bool>,
    /// OR semantics: a template matches if it carries any of these tags.
    /// An empty list is the same as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TemplateFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.checklist_type.is_none()
            && self.difficulty.is_none()
            && self.is_official.is_none()
            && self.tags.as_ref().map_or(true, Vec::is_empty)
    }

    /// Whether `template` satisfies every supplied field.
    pub fn matches(&self, template: &Template) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = template.name.to_lowercase().contains(&needle)
                || template.description.to_lowercase().contains(&needle)
                || template
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &template.category != category {
                return false;
            }
        }
        if let Some(checklist) = &self.checklist_type {
            if &template.checklist_type != checklist {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if template.difficulty != difficulty {
                return false;
            }
        }
        if let Some(official) = self.is_official {
            if template.is_official != official {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.is_empty() && !tags.iter().any(|t| template.has_tag(t)) {
                return false;
            }
        }
        true
    }
}

/// Templates matching `filter`, in collection order.
pub fn filter_templates<'a>(templates: &'a [Template], filter: &TemplateFilter) -> Vec<&'a Template> {
    templates.iter().filter(|t| filter.matches(t)).collect()
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
    /// Ordered by `download_count`.
    UsageCount,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "created" | "created_at" => Ok(SortKey::CreatedAt),
            "updated" | "updated_at" => Ok(SortKey::UpdatedAt),
            "usage" | "usage_count" | "downloads" => Ok(SortKey::UsageCount),
            other => Err(format!(
                "unknown sort key '{other}'; expected: name, created, updated, usage"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub by: SortKey,
    pub dir: SortDirection,
}

impl SortSpec {
    pub fn new(by: SortKey, dir: SortDirection) -> Self {
        Self { by, dir }
    }

    fn compare(&self, a: &Template, b: &Template) -> Ordering {
        let ord = match self.by {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::UsageCount => a.download_count.cmp(&b.download_count),
        };
        match self.dir {
            SortDirection::Asc => ord,
            // Reversing the key (not the slice) keeps ties in catalog order.
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Stable in-place sort by `spec`.
pub fn sort_templates(templates: &mut [&Template], spec: SortSpec) {
    templates.sort_by(|a, b| spec.compare(a, b));
}

/// Filter then optionally sort.
pub fn query<'a>(
    templates: &'a [Template],
    filter: &TemplateFilter,
    sort: Option<SortSpec>,
) -> Vec<&'a Template> {
    let mut hits = filter_templates(templates, filter);
    if let Some(spec) = sort {
        sort_templates(&mut hits, spec);
    }
    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
