//! Garment attribute taxonomy.
//!
//! Every label the classifier can emit maps onto one of the enums below. A
//! label without a mapping is reported as [`TaxonomyError::Unmapped`]; nothing
//! here falls back to a default value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("unmapped {dimension} label `{label}`")]
    Unmapped { dimension: &'static str, label: String },
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' ', '/'], "_")
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn unmapped(dimension: &'static str, label: &str) -> TaxonomyError {
    TaxonomyError::Unmapped { dimension, label: label.to_string() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Top,
    Bottom,
}

impl Group {
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub fn categories(self) -> Vec<Category> {
        Category::ALL.iter().copied().filter(|category| group_of(*category) == self).collect()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "top" | "tops" => Ok(Self::Top),
            "bottom" | "bottoms" => Ok(Self::Bottom),
            _ => Err(unmapped("group", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TShirt,
    Shirt,
    Sweater,
    Hoodie,
    Cardigan,
    Jacket,
    Coat,
    Vest,
    Pants,
    Jeans,
    Shorts,
    Skirt,
    Leggings,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Self::TShirt,
        Self::Shirt,
        Self::Sweater,
        Self::Hoodie,
        Self::Cardigan,
        Self::Jacket,
        Self::Coat,
        Self::Vest,
        Self::Pants,
        Self::Jeans,
        Self::Shorts,
        Self::Skirt,
        Self::Leggings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TShirt => "t_shirt",
            Self::Shirt => "shirt",
            Self::Sweater => "sweater",
            Self::Hoodie => "hoodie",
            Self::Cardigan => "cardigan",
            Self::Jacket => "jacket",
            Self::Coat => "coat",
            Self::Vest => "vest",
            Self::Pants => "pants",
            Self::Jeans => "jeans",
            Self::Shorts => "shorts",
            Self::Skirt => "skirt",
            Self::Leggings => "leggings",
        }
    }

    pub fn group(self) -> Group {
        group_of(self)
    }
}

/// Partitions categories into the two outfit slots.
pub fn group_of(category: Category) -> Group {
    match category {
        Category::TShirt
        | Category::Shirt
        | Category::Sweater
        | Category::Hoodie
        | Category::Cardigan
        | Category::Jacket
        | Category::Coat
        | Category::Vest => Group::Top,
        Category::Pants
        | Category::Jeans
        | Category::Shorts
        | Category::Skirt
        | Category::Leggings => Group::Bottom,
    }
}

impl FromStr for Category {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "t_shirt" | "tshirt" | "tee" | "short_sleeved_shirt" | "short_sleeve_top" => {
                Ok(Self::TShirt)
            }
            "shirt" | "long_sleeved_shirt" | "blouse" => Ok(Self::Shirt),
            "sweater" | "sweatshirt" | "pullover" => Ok(Self::Sweater),
            "hoodie" | "hooded" => Ok(Self::Hoodie),
            "cardigan" => Ok(Self::Cardigan),
            "jacket" | "short_sleeved_outwear" | "long_sleeved_outwear" | "blazer" => {
                Ok(Self::Jacket)
            }
            "coat" | "padding_coat" | "trench_coat" => Ok(Self::Coat),
            "vest" | "sling" | "sleeveless" => Ok(Self::Vest),
            "pants" | "trousers" | "slacks" => Ok(Self::Pants),
            "jeans" | "denim_pants" => Ok(Self::Jeans),
            "shorts" | "short_pants" => Ok(Self::Shorts),
            "skirt" => Ok(Self::Skirt),
            "leggings" | "jogger" | "joggers" => Ok(Self::Leggings),
            _ => Err(unmapped("category", value)),
        }
    }
}

/// Tone family used for pairing rules between two colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneFamily {
    Neutral,
    Warm,
    Cool,
    Earth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
    Gray,
    Beige,
    Navy,
    Brown,
    Khaki,
    Blue,
    SkyBlue,
    Green,
    Purple,
    Red,
    Pink,
    Orange,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 15] = [
        Self::White,
        Self::Black,
        Self::Gray,
        Self::Beige,
        Self::Navy,
        Self::Brown,
        Self::Khaki,
        Self::Blue,
        Self::SkyBlue,
        Self::Green,
        Self::Purple,
        Self::Red,
        Self::Pink,
        Self::Orange,
        Self::Yellow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Gray => "gray",
            Self::Beige => "beige",
            Self::Navy => "navy",
            Self::Brown => "brown",
            Self::Khaki => "khaki",
            Self::Blue => "blue",
            Self::SkyBlue => "sky_blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
        }
    }

    pub fn tone(self) -> ToneFamily {
        match self {
            Self::White | Self::Black | Self::Gray | Self::Beige | Self::Navy => {
                ToneFamily::Neutral
            }
            Self::Brown | Self::Khaki => ToneFamily::Earth,
            Self::Blue | Self::SkyBlue | Self::Green | Self::Purple => ToneFamily::Cool,
            Self::Red | Self::Pink | Self::Orange | Self::Yellow => ToneFamily::Warm,
        }
    }

    pub fn is_neutral(self) -> bool {
        self.tone() == ToneFamily::Neutral
    }
}

impl FromStr for Color {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "white" | "ivory" => Ok(Self::White),
            "black" => Ok(Self::Black),
            "gray" | "grey" | "charcoal" => Ok(Self::Gray),
            "beige" | "cream" => Ok(Self::Beige),
            "navy" => Ok(Self::Navy),
            "brown" | "camel" => Ok(Self::Brown),
            "khaki" | "olive" => Ok(Self::Khaki),
            "blue" => Ok(Self::Blue),
            "sky_blue" | "skyblue" | "light_blue" => Ok(Self::SkyBlue),
            "green" | "mint" => Ok(Self::Green),
            "purple" | "lavender" => Ok(Self::Purple),
            "red" | "wine" | "burgundy" => Ok(Self::Red),
            "pink" => Ok(Self::Pink),
            "orange" => Ok(Self::Orange),
            "yellow" => Ok(Self::Yellow),
            _ => Err(unmapped("color", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Print {
    Solid,
    Stripe,
    Check,
    Dot,
    Lettering,
    Graphic,
    Floral,
    Camouflage,
    Animal,
}

impl Print {
    pub const ALL: [Print; 9] = [
        Self::Solid,
        Self::Stripe,
        Self::Check,
        Self::Dot,
        Self::Lettering,
        Self::Graphic,
        Self::Floral,
        Self::Camouflage,
        Self::Animal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Stripe => "stripe",
            Self::Check => "check",
            Self::Dot => "dot",
            Self::Lettering => "lettering",
            Self::Graphic => "graphic",
            Self::Floral => "floral",
            Self::Camouflage => "camouflage",
            Self::Animal => "animal",
        }
    }

    /// How much visual weight the print carries, 0.0 for solid up to 0.9.
    pub fn loudness(self) -> f64 {
        match self {
            Self::Solid => 0.0,
            Self::Stripe => 0.3,
            Self::Check => 0.35,
            Self::Dot => 0.4,
            Self::Lettering => 0.5,
            Self::Graphic => 0.6,
            Self::Floral => 0.7,
            Self::Camouflage => 0.8,
            Self::Animal => 0.9,
        }
    }

    pub fn is_patterned(self) -> bool {
        self != Self::Solid
    }
}

impl FromStr for Print {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "solid" | "plain" | "none" => Ok(Self::Solid),
            "stripe" | "striped" | "stripes" => Ok(Self::Stripe),
            "check" | "checked" | "plaid" | "gingham" => Ok(Self::Check),
            "dot" | "dots" | "polka_dot" => Ok(Self::Dot),
            "lettering" | "text" | "logo" => Ok(Self::Lettering),
            "graphic" | "print" => Ok(Self::Graphic),
            "floral" | "flower" => Ok(Self::Floral),
            "camouflage" | "camo" | "military" => Ok(Self::Camouflage),
            "animal" | "leopard" | "zebra" => Ok(Self::Animal),
            _ => Err(unmapped("print", value)),
        }
    }
}

/// Weather-relevant properties of a material, each in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialTraits {
    pub insulation: f64,
    pub breathability: f64,
    pub water_resistance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Cotton,
    Denim,
    Linen,
    Wool,
    Knit,
    Fleece,
    Leather,
    Padding,
    Nylon,
    Polyester,
    Chiffon,
    Corduroy,
    Silk,
}

impl Material {
    pub const ALL: [Material; 13] = [
        Self::Cotton,
        Self::Denim,
        Self::Linen,
        Self::Wool,
        Self::Knit,
        Self::Fleece,
        Self::Leather,
        Self::Padding,
        Self::Nylon,
        Self::Polyester,
        Self::Chiffon,
        Self::Corduroy,
        Self::Silk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cotton => "cotton",
            Self::Denim => "denim",
            Self::Linen => "linen",
            Self::Wool => "wool",
            Self::Knit => "knit",
            Self::Fleece => "fleece",
            Self::Leather => "leather",
            Self::Padding => "padding",
            Self::Nylon => "nylon",
            Self::Polyester => "polyester",
            Self::Chiffon => "chiffon",
            Self::Corduroy => "corduroy",
            Self::Silk => "silk",
        }
    }

    pub fn traits(self) -> MaterialTraits {
        let (insulation, breathability, water_resistance) = match self {
            Self::Cotton => (0.3, 0.8, 0.1),
            Self::Denim => (0.5, 0.4, 0.2),
            Self::Linen => (0.1, 1.0, 0.0),
            Self::Wool => (0.9, 0.4, 0.3),
            Self::Knit => (0.8, 0.4, 0.1),
            Self::Fleece => (0.9, 0.3, 0.2),
            Self::Leather => (0.6, 0.1, 0.7),
            Self::Padding => (1.0, 0.1, 0.8),
            Self::Nylon => (0.3, 0.3, 0.9),
            Self::Polyester => (0.3, 0.5, 0.6),
            Self::Chiffon => (0.1, 0.9, 0.0),
            Self::Corduroy => (0.7, 0.3, 0.2),
            Self::Silk => (0.2, 0.7, 0.0),
        };
        MaterialTraits { insulation, breathability, water_resistance }
    }

    pub fn is_insulating(self) -> bool {
        self.traits().insulation >= 0.7
    }
}

impl FromStr for Material {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "cotton" => Ok(Self::Cotton),
            "denim" | "jean" => Ok(Self::Denim),
            "linen" => Ok(Self::Linen),
            "wool" | "cashmere" => Ok(Self::Wool),
            "knit" | "knitwear" => Ok(Self::Knit),
            "fleece" | "boa" => Ok(Self::Fleece),
            "leather" | "suede" => Ok(Self::Leather),
            "padding" | "padded" | "down" => Ok(Self::Padding),
            "nylon" => Ok(Self::Nylon),
            "polyester" | "synthetic" => Ok(Self::Polyester),
            "chiffon" | "lace" => Ok(Self::Chiffon),
            "corduroy" => Ok(Self::Corduroy),
            "silk" | "satin" => Ok(Self::Silk),
            _ => Err(unmapped("material", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Crop,
    Short,
    Regular,
    Long,
}

impl Length {
    pub const ALL: [Length; 4] = [Self::Crop, Self::Short, Self::Regular, Self::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Short => "short",
            Self::Regular => "regular",
            Self::Long => "long",
        }
    }

    /// Body coverage on a `0.0..=1.0` scale.
    pub fn coverage(self) -> f64 {
        match self {
            Self::Crop => 0.0,
            Self::Short => 1.0 / 3.0,
            Self::Regular => 2.0 / 3.0,
            Self::Long => 1.0,
        }
    }
}

impl FromStr for Length {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "crop" | "cropped" => Ok(Self::Crop),
            "short" | "mini" | "short_sleeve" => Ok(Self::Short),
            "regular" | "normal" | "medium" | "midi" | "knee" => Ok(Self::Regular),
            "long" | "maxi" | "long_sleeve" | "ankle" => Ok(Self::Long),
            _ => Err(unmapped("length", value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Casual,
    Formal,
    Street,
    Sporty,
    Romantic,
    Minimal,
    Vintage,
}

// Symmetric, indexed in `Style::ALL` order.
const STYLE_AFFINITY: [[f64; 7]; 7] = [
    // casual formal street sporty romantic minimal vintage
    [1.0, 0.2, 0.6, 0.6, 0.4, 0.6, 0.5],
    [0.2, 1.0, 0.1, 0.0, 0.4, 0.7, 0.4],
    [0.6, 0.1, 1.0, 0.6, 0.2, 0.3, 0.5],
    [0.6, 0.0, 0.6, 1.0, 0.1, 0.3, 0.2],
    [0.4, 0.4, 0.2, 0.1, 1.0, 0.3, 0.6],
    [0.6, 0.7, 0.3, 0.3, 0.3, 1.0, 0.3],
    [0.5, 0.4, 0.5, 0.2, 0.6, 0.3, 1.0],
];

impl Style {
    pub const ALL: [Style; 7] = [
        Self::Casual,
        Self::Formal,
        Self::Street,
        Self::Sporty,
        Self::Romantic,
        Self::Minimal,
        Self::Vintage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Street => "street",
            Self::Sporty => "sporty",
            Self::Romantic => "romantic",
            Self::Minimal => "minimal",
            Self::Vintage => "vintage",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Casual => 0,
            Self::Formal => 1,
            Self::Street => 2,
            Self::Sporty => 3,
            Self::Romantic => 4,
            Self::Minimal => 5,
            Self::Vintage => 6,
        }
    }

    /// How well two styles sit together, 1.0 for identical styles.
    pub fn affinity(self, other: Style) -> f64 {
        STYLE_AFFINITY[self.index()][other.index()]
    }

    /// Tolerance for non-neutral colors in `0.0..=1.0`.
    pub fn bold_color_tolerance(self) -> f64 {
        match self {
            Self::Minimal => 0.1,
            Self::Formal => 0.2,
            Self::Vintage => 0.5,
            Self::Casual => 0.6,
            Self::Romantic => 0.6,
            Self::Street => 0.8,
            Self::Sporty => 0.9,
        }
    }

    /// Tolerance for loud prints in `0.0..=1.0`.
    pub fn print_tolerance(self) -> f64 {
        match self {
            Self::Minimal => 0.0,
            Self::Formal => 0.1,
            Self::Sporty => 0.3,
            Self::Casual => 0.4,
            Self::Romantic => 0.5,
            Self::Vintage => 0.5,
            Self::Street => 0.6,
        }
    }
}

impl FromStr for Style {
    type Err = TaxonomyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "casual" | "daily" => Ok(Self::Casual),
            "formal" | "office" | "business" | "classic" => Ok(Self::Formal),
            "street" | "streetwear" | "hip_hop" => Ok(Self::Street),
            "sporty" | "sport" | "athleisure" => Ok(Self::Sporty),
            "romantic" | "feminine" | "lovely" => Ok(Self::Romantic),
            "minimal" | "minimalist" | "modern" => Ok(Self::Minimal),
            "vintage" | "retro" => Ok(Self::Vintage),
            _ => Err(unmapped("style", value)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(Category, Color, Print, Material, Length, Style);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_belongs_to_exactly_one_group() {
        let tops = Group::Top.categories();
        let bottoms = Group::Bottom.categories();

        assert_eq!(tops.len() + bottoms.len(), Category::ALL.len());
        assert!(tops.iter().all(|category| !bottoms.contains(category)));
        assert_eq!(group_of(Category::Shirt), Group::Top);
        assert_eq!(group_of(Category::Jeans), Group::Bottom);
    }

    #[test]
    fn detector_labels_parse_with_aliases() {
        assert_eq!("Short Sleeved Shirt".parse::<Category>(), Ok(Category::TShirt));
        assert_eq!("long-sleeved-outwear".parse::<Category>(), Ok(Category::Jacket));
        assert_eq!("trousers".parse::<Category>(), Ok(Category::Pants));
        assert_eq!("grey".parse::<Color>(), Ok(Color::Gray));
        assert_eq!("plaid".parse::<Print>(), Ok(Print::Check));
        assert_eq!("down".parse::<Material>(), Ok(Material::Padding));
        assert_eq!("maxi".parse::<Length>(), Ok(Length::Long));
        assert_eq!("Streetwear".parse::<Style>(), Ok(Style::Street));
    }

    #[test]
    fn unmapped_labels_are_reported_not_defaulted() {
        let error = "long_sleeved_dress".parse::<Category>().expect_err("dress is unmapped");
        assert_eq!(
            error,
            TaxonomyError::Unmapped { dimension: "category", label: "long_sleeved_dress".into() }
        );
        assert!("glitter".parse::<Material>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn canonical_names_round_trip_through_parse() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        for color in Color::ALL {
            assert_eq!(color.as_str().parse::<Color>(), Ok(color));
        }
        for style in Style::ALL {
            assert_eq!(style.as_str().parse::<Style>(), Ok(style));
        }
    }

    #[test]
    fn style_affinity_is_symmetric_and_reflexive() {
        for a in Style::ALL {
            assert_eq!(a.affinity(a), 1.0);
            for b in Style::ALL {
                assert_eq!(a.affinity(b), b.affinity(a));
            }
        }
    }

    #[test]
    fn insulating_materials_have_higher_insulation() {
        for material in Material::ALL {
            assert_eq!(material.is_insulating(), material.traits().insulation >= 0.7);
        }
        assert!(Material::Wool.is_insulating());
        assert!(!Material::Linen.is_insulating());
    }
}
