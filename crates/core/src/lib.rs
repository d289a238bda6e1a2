pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;
pub mod taxonomy;
pub mod weather;

pub use domain::garment::{
    AttributeLabels, GarmentAttributes, GarmentId, GarmentRecord, ImageRef, UserId,
};
pub use domain::profile::{AgeBracket, Sex, UserProfile};
pub use domain::weather::{WeatherCondition, WeatherSummary};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{
    recommend, RecommendationEngine, RecommendationMode, RecommendationRequest,
    RecommendationResult, RequestError, ScoringPolicy, SlotOutcome, WeightedModesPolicy,
};
pub use taxonomy::{Category, Color, Group, Length, Material, Print, Style, TaxonomyError};
pub use weather::{Coordinate, GridLocator, GridPoint, WeatherError, WeatherProvider};
