use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "cattles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    /// Tag issued by the external INAPH registry, when known.
    #[sea_orm(unique)]
    pub inaph_tag_id: Option<String>,
    pub inaph_farmer_id: Option<String>,
    /// Locally generated human-readable id, "LIFE-<8 hex>".
    #[sea_orm(unique)]
    pub local_cattle_id: String,
    pub species: String,
    pub breed: String,
    pub sex: String,
    pub dob: DateTime,
    pub colour_markings: Option<String>,
    pub weight: Option<f64>,
    pub health_condition: Option<String>,
    pub purchased_date: Option<DateTime>,
    pub source: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub last_known_location: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farmer::Entity",
        from = "Column::OwnerId",
        to = "super::farmer::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Farmer,
}

impl Related<super::farmer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farmer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
