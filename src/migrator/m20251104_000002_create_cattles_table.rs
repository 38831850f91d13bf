use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cattles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cattles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cattles::InaphTagId).string().unique_key())
                    .col(ColumnDef::new(Cattles::InaphFarmerId).string())
                    .col(
                        ColumnDef::new(Cattles::LocalCattleId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cattles::Species).string().not_null())
                    .col(ColumnDef::new(Cattles::Breed).string().not_null())
                    .col(ColumnDef::new(Cattles::Sex).string().not_null())
                    .col(ColumnDef::new(Cattles::Dob).date_time().not_null())
                    .col(ColumnDef::new(Cattles::ColourMarkings).string())
                    .col(ColumnDef::new(Cattles::Weight).double())
                    .col(ColumnDef::new(Cattles::HealthCondition).string())
                    .col(ColumnDef::new(Cattles::PurchasedDate).date_time())
                    .col(ColumnDef::new(Cattles::Source).string())
                    .col(ColumnDef::new(Cattles::PhotoUrl).string())
                    .col(ColumnDef::new(Cattles::Status).string().not_null())
                    .col(ColumnDef::new(Cattles::LastKnownLocation).string())
                    .col(ColumnDef::new(Cattles::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Cattles::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Cattles::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cattle-owner_id")
                            .from(Cattles::Table, Cattles::OwnerId)
                            .to(Farmers::Table, Farmers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cattles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cattles {
    Table,
    Id,
    InaphTagId,
    InaphFarmerId,
    LocalCattleId,
    Species,
    Breed,
    Sex,
    Dob,
    ColourMarkings,
    Weight,
    HealthCondition,
    PurchasedDate,
    Source,
    PhotoUrl,
    Status,
    LastKnownLocation,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
}
