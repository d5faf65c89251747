//! The Category-Symptom store: an insertion-ordered mapping from category
//! name to an ordered list of symptom names, scoped to one gene.
//!
//! Category order and symptom order are both semantically meaningful — the
//! remote store persists the position of every symptom as an `order` integer,
//! and the first category returned by a fetch becomes the default selection.
//! JSON objects round-trip through a hand-written map visitor so that key
//! order survives (serde_json's default map type sorts keys).

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use phenokb_common::SymptomRecord;

/// Reserved category that receives "deleted" symptoms. Deletion is a
/// relocation into this bucket, never a removal from the structure.
pub const ARCHIVED_CATEGORY: &str = "Archived";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryEntry {
    name: String,
    symptoms: Vec<String>,
}

/// Ordered mapping from category name to ordered symptom names.
///
/// Invariant: a symptom belonging to the gene appears in exactly one
/// category's sequence. There is no public mutation API; all changes flow
/// through [`crate::drag::move_item`] and [`CategorizedSymptoms::archive`],
/// which uphold the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorizedSymptoms {
    categories: Vec<CategoryEntry>,
}

impl CategorizedSymptoms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from (category, symptoms) pairs, keeping pair order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let categories = pairs
            .into_iter()
            .map(|(name, symptoms)| CategoryEntry {
                name: name.into(),
                symptoms: symptoms.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Category names in insertion order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// First category in insertion order, the default selection after a fetch.
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.name.as_str())
    }

    /// Ordered symptom list of one category, if the category exists.
    pub fn symptoms(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.symptoms.as_slice())
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of symptoms across all categories.
    pub fn symptom_count(&self) -> usize {
        self.categories.iter().map(|c| c.symptoms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains_symptom(&self, symptom: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.symptoms.iter().any(|s| s == symptom))
    }

    /// The symptom list of `category`, created empty at the tail if absent.
    pub(crate) fn entry_mut(&mut self, category: &str) -> &mut Vec<String> {
        if let Some(pos) = self.categories.iter().position(|c| c.name == category) {
            return &mut self.categories[pos].symptoms;
        }
        self.categories.push(CategoryEntry {
            name: category.to_string(),
            symptoms: Vec::new(),
        });
        &mut self.categories.last_mut().expect("just pushed").symptoms
    }

    /// Relocate `symptom` from every non-Archived category into the Archived
    /// bucket. Structurally idempotent: archiving an already-archived (or
    /// unknown) symptom returns an unchanged store.
    pub fn archive(&self, symptom: &str) -> CategorizedSymptoms {
        let mut next = self.clone();
        let mut removed = false;

        for entry in &mut next.categories {
            if entry.name == ARCHIVED_CATEGORY {
                continue;
            }
            let before = entry.symptoms.len();
            entry.symptoms.retain(|s| s != symptom);
            removed |= entry.symptoms.len() != before;
        }

        if !removed {
            return next;
        }

        let archived = next.entry_mut(ARCHIVED_CATEGORY);
        if !archived.iter().any(|s| s == symptom) {
            archived.push(symptom.to_string());
        }
        next
    }

    /// Flatten the store into per-symptom order records for `gene`, one
    /// record per symptom, `order` = zero-based position within its category.
    pub fn flatten(&self, gene: &str) -> Vec<SymptomRecord> {
        let mut records = Vec::with_capacity(self.symptom_count());
        for entry in &self.categories {
            for (order, symptom) in entry.symptoms.iter().enumerate() {
                records.push(SymptomRecord::new(gene, symptom, &entry.name, order as i64));
            }
        }
        records
    }

    /// Rebuild a store from flattened records. Categories keep first-seen
    /// order; within a category, symptoms are sorted by their `order` field.
    /// Inverse of [`CategorizedSymptoms::flatten`].
    pub fn regroup(records: &[SymptomRecord]) -> CategorizedSymptoms {
        let mut grouped: Vec<(String, Vec<(i64, String)>)> = Vec::new();
        for rec in records {
            match grouped.iter_mut().find(|(name, _)| *name == rec.category_name) {
                Some((_, rows)) => rows.push((rec.order, rec.symptom_name.clone())),
                None => grouped.push((
                    rec.category_name.clone(),
                    vec![(rec.order, rec.symptom_name.clone())],
                )),
            }
        }

        let categories = grouped
            .into_iter()
            .map(|(name, mut rows)| {
                rows.sort_by_key(|(order, _)| *order);
                CategoryEntry {
                    name,
                    symptoms: rows.into_iter().map(|(_, s)| s).collect(),
                }
            })
            .collect();
        CategorizedSymptoms { categories }
    }
}

// ---------------------------------------------------------------------------
// Order-preserving JSON (de)serialization
// ---------------------------------------------------------------------------

impl Serialize for CategorizedSymptoms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for entry in &self.categories {
            map.serialize_entry(&entry.name, &entry.symptoms)?;
        }
        map.end()
    }
}

struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = CategorizedSymptoms;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of category name to symptom list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
        // MapAccess yields entries in document order regardless of the
        // backing map type, which is exactly what we need to keep.
        while let Some((name, symptoms)) = access.next_entry::<String, Vec<String>>()? {
            categories.push(CategoryEntry { name, symptoms });
        }
        Ok(CategorizedSymptoms { categories })
    }
}

impl<'de> Deserialize<'de> for CategorizedSymptoms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}
