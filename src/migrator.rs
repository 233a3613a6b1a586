use sea_orm_migration::prelude::*;

/// In-crate migrator.
///
/// Users are created first so the creator-attributed tables can carry a real
/// foreign key for `created_by`; the user's own role/branch references are
/// plain nullable columns to avoid a circular constraint.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_roles_table::Migration),
            Box::new(m20240101_000003_create_branches_table::Migration),
            Box::new(m20240101_000004_create_dealers_table::Migration),
            Box::new(m20240101_000005_create_product_supplies_table::Migration),
        ]
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    IsStaff,
    IsSuperuser,
    IsActive,
    MustChangePassword,
    RoleId,
    BranchId,
    Otp,
    OtpCreatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    Name,
    Address,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Dealers {
    Table,
    Id,
    Name,
    MobileNumber,
    CompanyName,
    Email,
    AddressLine1,
    AddressLine2,
    Pincode,
    State,
    BranchId,
    UserId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProductSupplies {
    Table,
    Id,
    DealerId,
    ProductName,
    InvoiceNumber,
    SerialNumber,
    PurchaseDate,
    Count,
    ChaseNumber,
    VehicleModel,
    VehicleVariant,
    VehicleWarranty,
    Controller,
    Motor,
    BatteryNumber,
    BatteryModel,
    BatteryVariant,
    BatteryWarranty,
    BulgingWarranty,
    ChargerNumber,
    ChargerModel,
    ChargerType,
    ChargerVariant,
    ChargerWarranty,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

mod m20240101_000001_create_users_table {
    use super::Users;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FirstName).string())
                        .col(ColumnDef::new(Users::LastName).string())
                        .col(
                            ColumnDef::new(Users::IsStaff)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::IsSuperuser)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::MustChangePassword)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Users::RoleId).big_integer())
                        .col(ColumnDef::new(Users::BranchId).big_integer())
                        .col(ColumnDef::new(Users::Otp).string())
                        .col(ColumnDef::new(Users::OtpCreatedAt).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_roles_table {
    use super::{Roles, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_roles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Roles::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Roles::CreatedBy).big_integer())
                        .col(
                            ColumnDef::new(Roles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Roles::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_roles_created_by")
                                .from(Roles::Table, Roles::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Roles::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000003_create_branches_table {
    use super::{Branches, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_branches_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Branches::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Branches::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Branches::Name).string().not_null())
                        .col(ColumnDef::new(Branches::Address).text())
                        .col(ColumnDef::new(Branches::CreatedBy).big_integer())
                        .col(
                            ColumnDef::new(Branches::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Branches::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_branches_created_by")
                                .from(Branches::Table, Branches::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Branches::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000004_create_dealers_table {
    use super::{Branches, Dealers, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_dealers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Dealers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Dealers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Dealers::Name).string().not_null())
                        .col(ColumnDef::new(Dealers::MobileNumber).string().not_null())
                        .col(ColumnDef::new(Dealers::CompanyName).string())
                        .col(ColumnDef::new(Dealers::Email).string())
                        .col(ColumnDef::new(Dealers::AddressLine1).string().not_null())
                        .col(ColumnDef::new(Dealers::AddressLine2).string())
                        .col(ColumnDef::new(Dealers::Pincode).string())
                        .col(ColumnDef::new(Dealers::State).string())
                        .col(ColumnDef::new(Dealers::BranchId).big_integer().not_null())
                        .col(ColumnDef::new(Dealers::UserId).big_integer().unique_key())
                        .col(ColumnDef::new(Dealers::CreatedBy).big_integer())
                        .col(
                            ColumnDef::new(Dealers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Dealers::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_dealers_branch")
                                .from(Dealers::Table, Dealers::BranchId)
                                .to(Branches::Table, Branches::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_dealers_user")
                                .from(Dealers::Table, Dealers::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_dealers_created_by")
                                .from(Dealers::Table, Dealers::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_dealers_branch_id")
                        .table(Dealers::Table)
                        .col(Dealers::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Dealers::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000005_create_product_supplies_table {
    use super::{Dealers, ProductSupplies, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_product_supplies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductSupplies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductSupplies::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSupplies::DealerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSupplies::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSupplies::InvoiceNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSupplies::SerialNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ProductSupplies::PurchaseDate).date())
                        .col(
                            ColumnDef::new(ProductSupplies::Count)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(ProductSupplies::ChaseNumber).string())
                        .col(ColumnDef::new(ProductSupplies::VehicleModel).string())
                        .col(ColumnDef::new(ProductSupplies::VehicleVariant).string())
                        .col(ColumnDef::new(ProductSupplies::VehicleWarranty).string())
                        .col(ColumnDef::new(ProductSupplies::Controller).string())
                        .col(ColumnDef::new(ProductSupplies::Motor).string())
                        .col(ColumnDef::new(ProductSupplies::BatteryNumber).string())
                        .col(ColumnDef::new(ProductSupplies::BatteryModel).string())
                        .col(ColumnDef::new(ProductSupplies::BatteryVariant).string())
                        .col(ColumnDef::new(ProductSupplies::BatteryWarranty).string())
                        .col(ColumnDef::new(ProductSupplies::BulgingWarranty).string())
                        .col(ColumnDef::new(ProductSupplies::ChargerNumber).string())
                        .col(ColumnDef::new(ProductSupplies::ChargerModel).string())
                        .col(ColumnDef::new(ProductSupplies::ChargerType).string())
                        .col(ColumnDef::new(ProductSupplies::ChargerVariant).string())
                        .col(ColumnDef::new(ProductSupplies::ChargerWarranty).string())
                        .col(ColumnDef::new(ProductSupplies::Remarks).text())
                        .col(ColumnDef::new(ProductSupplies::CreatedBy).big_integer())
                        .col(
                            ColumnDef::new(ProductSupplies::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductSupplies::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_supplies_dealer")
                                .from(ProductSupplies::Table, ProductSupplies::DealerId)
                                .to(Dealers::Table, Dealers::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_supplies_created_by")
                                .from(ProductSupplies::Table, ProductSupplies::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_supplies_dealer_id")
                        .table(ProductSupplies::Table)
                        .col(ProductSupplies::DealerId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductSupplies::Table).to_owned())
                .await
        }
    }
}
