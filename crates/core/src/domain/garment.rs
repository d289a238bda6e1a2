use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, Color, Group, Length, Material, Print, Style, TaxonomyError};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GarmentId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Public reference to the stored garment photo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GarmentAttributes {
    pub category: Category,
    pub color: Color,
    pub print: Print,
    pub material: Material,
    pub length: Length,
    pub style: Style,
}

impl GarmentAttributes {
    pub fn group(&self) -> Group {
        self.category.group()
    }
}

/// Raw classifier labels for one detected garment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeLabels {
    pub category: String,
    pub color: String,
    pub print: String,
    pub material: String,
    pub length: String,
    pub style: String,
}

impl TryFrom<&AttributeLabels> for GarmentAttributes {
    type Error = TaxonomyError;

    fn try_from(labels: &AttributeLabels) -> Result<Self, Self::Error> {
        Ok(Self {
            category: labels.category.parse()?,
            color: labels.color.parse()?,
            print: labels.print.parse()?,
            material: labels.material.parse()?,
            length: labels.length.parse()?,
            style: labels.style.parse()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GarmentRecord {
    pub id: GarmentId,
    #[serde(flatten)]
    pub attributes: GarmentAttributes,
    pub image_ref: ImageRef,
    pub added_at: DateTime<Utc>,
}

impl GarmentRecord {
    pub fn group(&self) -> Group {
        self.attributes.group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(category: &str) -> AttributeLabels {
        AttributeLabels {
            category: category.to_string(),
            color: "white".to_string(),
            print: "solid".to_string(),
            material: "cotton".to_string(),
            length: "short".to_string(),
            style: "casual".to_string(),
        }
    }

    #[test]
    fn classifier_labels_convert_into_attributes() {
        let attributes = GarmentAttributes::try_from(&labels("short_sleeved_shirt"))
            .expect("labels should map");

        assert_eq!(attributes.category, Category::TShirt);
        assert_eq!(attributes.group(), Group::Top);
        assert_eq!(attributes.material, Material::Cotton);
    }

    #[test]
    fn unmapped_classifier_category_is_an_error() {
        assert!(GarmentAttributes::try_from(&labels("vest_dress")).is_err());
    }

    #[test]
    fn record_serializes_attributes_flat() {
        let record = GarmentRecord {
            id: GarmentId("g-1".to_string()),
            attributes: GarmentAttributes::try_from(&labels("jeans")).expect("labels should map"),
            image_ref: ImageRef("https://img/g-1.jpg".to_string()),
            added_at: DateTime::parse_from_rfc3339("2024-05-01T09:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["id"], "g-1");
        assert_eq!(value["category"], "jeans");
        assert_eq!(value["image_ref"], "https://img/g-1.jpg");

        let decoded: GarmentRecord = serde_json::from_value(value).expect("deserialize");
        assert_eq!(decoded, record);
    }
}
