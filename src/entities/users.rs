use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Slack member ID (`U2147483697`), the external identity key.
    #[sea_orm(unique)]
    pub slack_user_id: String,

    pub slack_user_name: String,

    pub slack_user_token: String,

    pub created: String,

    pub last_modified: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
