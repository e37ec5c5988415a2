//! 公告附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notice_attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub notice_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notices::Entity",
        from = "Column::NoticeId",
        to = "super::notices::Column::Id"
    )]
    Notice,
}

impl Related<super::notices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attachment(self) -> crate::models::notices::entities::NoticeAttachment {
        use crate::models::notices::entities::NoticeAttachment;
        use chrono::{DateTime, Utc};

        NoticeAttachment {
            id: self.id,
            notice_id: self.notice_id,
            file_name: self.file_name,
            file_path: self.file_path,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
