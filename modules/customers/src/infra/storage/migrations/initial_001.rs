use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Guest).boolean().not_null())
                    .col(ColumnDef::new(Customers::Email).string().not_null())
                    .col(ColumnDef::new(Customers::PasswordHash).string())
                    .col(ColumnDef::new(Customers::FirstName).string().not_null())
                    .col(ColumnDef::new(Customers::LastName).string().not_null())
                    .col(ColumnDef::new(Customers::Gender).string())
                    .col(ColumnDef::new(Customers::Birthday).date())
                    .col(ColumnDef::new(Customers::Enabled).boolean().not_null())
                    .col(ColumnDef::new(Customers::Newsletter).boolean().not_null())
                    .col(ColumnDef::new(Customers::PartnerOffers).boolean().not_null())
                    .col(ColumnDef::new(Customers::GroupIds).json().not_null())
                    .col(
                        ColumnDef::new(Customers::DefaultGroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Customers::Company).string().not_null())
                    .col(ColumnDef::new(Customers::TaxId).string().not_null())
                    .col(ColumnDef::new(Customers::Website).string().not_null())
                    .col(ColumnDef::new(Customers::CreditTerms).string().not_null())
                    .col(ColumnDef::new(Customers::RiskClass).string().not_null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The application-level uniqueness check is a separate read before
        // the write (check-then-act); this index closes that race. Partial:
        // guests may share an email with anyone.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_registered_email \
                 ON customers (email) WHERE guest = FALSE",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Guest,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    Gender,
    Birthday,
    Enabled,
    Newsletter,
    PartnerOffers,
    GroupIds,
    DefaultGroupId,
    Company,
    TaxId,
    Website,
    CreditTerms,
    RiskClass,
    CreatedAt,
    UpdatedAt,
}
