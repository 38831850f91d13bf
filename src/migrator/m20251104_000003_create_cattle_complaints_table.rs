use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CattleComplaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CattleComplaints::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::ReporterName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::ReporterPhone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CattleComplaints::ReporterEmail).string())
                    .col(
                        ColumnDef::new(CattleComplaints::ReporterLocation)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::CattleCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::CattleType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::CattleCondition)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CattleComplaints::Description).text())
                    .col(ColumnDef::new(CattleComplaints::PhotoPath).string())
                    .col(
                        ColumnDef::new(CattleComplaints::SpottedDate)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::ExactLocation)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CattleComplaints::GpsLatitude).double())
                    .col(ColumnDef::new(CattleComplaints::GpsLongitude).double())
                    .col(ColumnDef::new(CattleComplaints::NearestLandmark).string())
                    .col(
                        ColumnDef::new(CattleComplaints::Status)
                            .string()
                            .not_null()
                            .default("Open"),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CattleComplaints::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CattleComplaints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CattleComplaints {
    Table,
    Id,
    ReporterName,
    ReporterPhone,
    ReporterEmail,
    ReporterLocation,
    CattleCount,
    CattleType,
    CattleCondition,
    Description,
    PhotoPath,
    SpottedDate,
    ExactLocation,
    GpsLatitude,
    GpsLongitude,
    NearestLandmark,
    Status,
    CreatedAt,
    UpdatedAt,
}
