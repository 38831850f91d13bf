use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Farmers Table
        manager
            .create_table(
                Table::create()
                    .table(Farmers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farmers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Farmers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Farmers::Aadhaar)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Farmers::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Farmers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Farmers::Address).string().not_null())
                    .col(ColumnDef::new(Farmers::District).string())
                    .col(ColumnDef::new(Farmers::State).string())
                    .col(ColumnDef::new(Farmers::FarmName).string().not_null())
                    .col(ColumnDef::new(Farmers::FarmType).string().not_null())
                    .col(ColumnDef::new(Farmers::InaphId).string().unique_key())
                    .col(ColumnDef::new(Farmers::PasswordHash).string())
                    .col(ColumnDef::new(Farmers::RegistrationDate).date_time())
                    .col(ColumnDef::new(Farmers::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Farmers::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create Vets Table
        manager
            .create_table(
                Table::create()
                    .table(Vets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Vets::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vets::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Vets::LicenseNo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vets::Clinic).string().not_null())
                    .col(ColumnDef::new(Vets::Address).string().not_null())
                    .col(ColumnDef::new(Vets::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Vets::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Vets::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create Shelters Table
        manager
            .create_table(
                Table::create()
                    .table(Shelters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shelters::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shelters::Name).string().not_null())
                    .col(
                        ColumnDef::new(Shelters::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Shelters::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Shelters::RegistrationNo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Shelters::Address).string().not_null())
                    .col(ColumnDef::new(Shelters::Capacity).integer().not_null())
                    .col(ColumnDef::new(Shelters::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Shelters::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Shelters::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shelters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farmers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
    Name,
    Aadhaar,
    Phone,
    Email,
    Address,
    District,
    State,
    FarmName,
    FarmType,
    InaphId,
    PasswordHash,
    RegistrationDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Vets {
    Table,
    Id,
    Name,
    Email,
    Phone,
    LicenseNo,
    Clinic,
    Address,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Shelters {
    Table,
    Id,
    Name,
    Email,
    Phone,
    RegistrationNo,
    Address,
    Capacity,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
