// src/domain/filter.rs

use chrono::NaiveDate;

use crate::domain::record::ListingRecord;

/// Sidebar filter state. Every criterion is independently optional;
/// criteria combine with AND semantics. `None` means no restriction
/// on that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// District membership (区域).
    pub districts: Option<Vec<String>>,
    /// Commercial-area membership (商圈).
    pub commercial_areas: Option<Vec<String>>,
    /// Inclusive price bounds, yuan.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Inclusive area bounds, ㎡.
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    /// Inclusive date bounds. A record without a parseable date cannot
    /// satisfy a date criterion and is excluded once one is set.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Pure function from (full cleaned dataset, criteria) to the matching
/// subset. Never mutates its input; applying the same criteria twice
/// returns the same set.
pub fn apply(records: &[ListingRecord], criteria: &FilterCriteria) -> Vec<ListingRecord> {
    records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}

fn matches(record: &ListingRecord, c: &FilterCriteria) -> bool {
    if let Some(districts) = &c.districts {
        match &record.district {
            Some(d) if districts.iter().any(|x| x == d) => {}
            _ => return false,
        }
    }

    if let Some(areas) = &c.commercial_areas {
        match &record.commercial_area {
            Some(a) if areas.iter().any(|x| x == a) => {}
            _ => return false,
        }
    }

    if let Some(min) = c.min_price {
        if record.price < min {
            return false;
        }
    }
    if let Some(max) = c.max_price {
        if record.price > max {
            return false;
        }
    }

    if let Some(min) = c.min_area {
        if record.area < min {
            return false;
        }
    }
    if let Some(max) = c.max_area {
        if record.area > max {
            return false;
        }
    }

    if c.date_from.is_some() || c.date_to.is_some() {
        let Some(date) = record.date else {
            return false;
        };
        if let Some(from) = c.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = c.date_to {
            if date > to {
                return false;
            }
        }
    }

    true
}
