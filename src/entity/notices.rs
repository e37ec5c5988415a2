//! 公告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub content: String,
    pub notice_type: String,
    pub course_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: i64,
    pub expiry_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notice(self) -> crate::models::notices::entities::Notice {
        use crate::models::notices::entities::{Notice, NoticeType};
        use chrono::{DateTime, Utc};

        Notice {
            id: self.id,
            title: self.title,
            content: self.content,
            notice_type: self
                .notice_type
                .parse::<NoticeType>()
                .unwrap_or(NoticeType::General),
            course_id: self.course_id,
            department_id: self.department_id,
            created_by: self.created_by,
            expiry_date: self
                .expiry_date
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
