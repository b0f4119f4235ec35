use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "frases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub company: String,

    pub document_type: String,

    pub reason: String,

    pub content: String,

    pub reviewed_by: Option<String>,

    /// ISO date (`YYYY-MM-DD`)
    pub review_date: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
