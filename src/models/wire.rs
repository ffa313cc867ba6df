//! Upstream response shapes and their normalization into [`CreatureRecord`].
//!
//! Two API generations are supported:
//!
//! - bulk: `GET /api/digimon` returning `[{name, img, level}]`
//! - per-identifier: `GET /digimon/{id}` returning
//!   `{id, name, images: [{href}], levels: [{level}]}`, plus the listing
//!   endpoint `GET /digimon?name=..` returning `{content: [...]}`
//!
//! Missing or `null` fields decode as empty values so that a sparse record
//! never fails the whole response.

use serde::{Deserialize, Deserializer};

use crate::models::CreatureRecord;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Bulk endpoint item.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkCreature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub img: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
}

impl From<BulkCreature> for CreatureRecord {
    fn from(item: BulkCreature) -> Self {
        Self {
            id: None,
            name: item.name.trim().to_string(),
            image: non_empty(item.img),
            levels: non_empty(item.level).into_iter().collect(),
        }
    }
}

/// Image entry of a detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub href: String,
}

/// Level entry of a detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
}

/// Per-identifier detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatureDetail {
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ImageRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: Vec<LevelRef>,
}

impl From<CreatureDetail> for CreatureRecord {
    fn from(detail: CreatureDetail) -> Self {
        Self {
            id: Some(detail.id),
            name: detail.name.trim().to_string(),
            image: detail.images.into_iter().find_map(|img| non_empty(img.href)),
            levels: detail
                .levels
                .into_iter()
                .filter_map(|l| non_empty(l.level))
                .collect(),
        }
    }
}

/// Listing endpoint item.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingItem {
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

impl From<ListingItem> for CreatureRecord {
    fn from(item: ListingItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.trim().to_string(),
            image: non_empty(item.image),
            levels: Vec::new(),
        }
    }
}

/// Listing page metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u32,
}

impl Pageable {
    /// One-based `page/pages` label.
    pub fn label(&self) -> String {
        format!("{}/{}", self.current_page.saturating_add(1), self.total_pages)
    }
}

/// Listing endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ListingItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pageable: Pageable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_item_normalizes() {
        let items: Vec<BulkCreature> = serde_json::from_str(
            r#"[{"name":"Koromon","img":"https://example.com/koromon.jpg","level":"In Training"}]"#,
        )
        .unwrap();
        let record = CreatureRecord::from(items[0].clone());

        assert_eq!(record.id, None);
        assert_eq!(record.name, "Koromon");
        assert_eq!(record.image.as_deref(), Some("https://example.com/koromon.jpg"));
        assert_eq!(record.levels, vec!["In Training".to_string()]);
    }

    #[test]
    fn test_bulk_item_tolerates_nulls() {
        let item: BulkCreature =
            serde_json::from_str(r#"{"name":"Tanemon","img":null,"level":null}"#).unwrap();
        let record = CreatureRecord::from(item);

        assert_eq!(record.image, None);
        assert!(record.levels.is_empty());
    }

    #[test]
    fn test_detail_takes_first_image_and_all_levels() {
        let detail: CreatureDetail = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Agumon",
                "xAntibody": false,
                "images": [{"href": "https://example.com/agumon.png", "transparent": false}],
                "levels": [{"id": 5, "level": "Rookie"}, {"id": 6, "level": "Child"}]
            }"#,
        )
        .unwrap();
        let record = CreatureRecord::from(detail);

        assert_eq!(record.id, Some(1));
        assert_eq!(record.image.as_deref(), Some("https://example.com/agumon.png"));
        assert_eq!(record.current_level(), Some("Rookie"));
        assert_eq!(record.levels.len(), 2);
    }

    #[test]
    fn test_detail_with_missing_arrays() {
        let detail: CreatureDetail =
            serde_json::from_str(r#"{"id": 7, "name": "Gomamon", "images": null}"#).unwrap();
        let record = CreatureRecord::from(detail);

        assert_eq!(record.image, None);
        assert_eq!(record.current_level(), None);
    }

    #[test]
    fn test_page_label_saturates() {
        let pageable: Pageable =
            serde_json::from_str(r#"{"currentPage": 4294967295, "totalPages": 2}"#).unwrap();
        assert_eq!(pageable.label(), "4294967295/2");
    }

    #[test]
    fn test_listing_page() {
        let page: ListingPage = serde_json::from_str(
            r#"{
                "content": [
                    {"id": 1, "name": "Agumon", "href": "https://example.com/digimon/1", "image": "https://example.com/1.png"}
                ],
                "pageable": {"currentPage": 0, "elementsOnPage": 1, "totalElements": 1, "totalPages": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(page.pageable.total_elements, 1);
        assert_eq!(page.pageable.label(), "1/1");
        let record = CreatureRecord::from(page.content[0].clone());
        assert_eq!(record.id, Some(1));
        assert!(record.levels.is_empty());
    }
}
