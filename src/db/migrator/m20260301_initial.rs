use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Phrases)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Company is the first facet of every search
        manager
            .create_index(
                Index::create()
                    .name("idx_frases_company")
                    .table(Phrases)
                    .col(crate::entities::phrases::Column::Company)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Phrases).to_owned())
            .await
    }
}
