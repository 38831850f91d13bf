use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "farmers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub name: String,
    /// Stored normalized as "DDDD DDDD DDDD".
    #[sea_orm(unique)]
    pub aadhaar: String,
    /// Stored normalized as 10 digits.
    pub phone: String,
    /// Stored lowercase.
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
    pub district: Option<String>,
    pub state: Option<String>,
    pub farm_name: String,
    pub farm_type: String,
    /// External registry id for pre-provisioned accounts.
    #[sea_orm(unique)]
    pub inaph_id: Option<String>,
    /// Absent for externally-provisioned accounts until the claim flow sets it.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub registration_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cattle::Entity")]
    Cattle,
}

impl Related<super::cattle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cattle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
