use sea_orm_migration::prelude::*;

use crate::m20250123_000001_create_tables::{Courses, Departments, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 公告表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Content).text().not_null())
                    .col(ColumnDef::new(Notices::NoticeType).string().not_null())
                    .col(ColumnDef::new(Notices::CourseId).big_integer().null())
                    .col(ColumnDef::new(Notices::DepartmentId).big_integer().null())
                    .col(ColumnDef::new(Notices::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Notices::ExpiryDate).big_integer().null())
                    .col(ColumnDef::new(Notices::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Notices::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notices::Table, Notices::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notices::Table, Notices::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 公告附件表 ====================
        manager
            .create_table(
                Table::create()
                    .table(NoticeAttachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoticeAttachments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoticeAttachments::NoticeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoticeAttachments::FileName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoticeAttachments::FilePath)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoticeAttachments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NoticeAttachments::Table, NoticeAttachments::NoticeId)
                            .to(Notices::Table, Notices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 公告已读回执表 ====================
        manager
            .create_table(
                Table::create()
                    .table(NoticeReads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoticeReads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoticeReads::NoticeId).big_integer().not_null())
                    .col(ColumnDef::new(NoticeReads::UserId).big_integer().not_null())
                    .col(ColumnDef::new(NoticeReads::ReadAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(NoticeReads::Table, NoticeReads::NoticeId)
                            .to(Notices::Table, Notices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NoticeReads::Table, NoticeReads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_notice_reads_notice_user")
                    .table(NoticeReads::Table)
                    .col(NoticeReads::NoticeId)
                    .col(NoticeReads::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notices_type")
                    .table(Notices::Table)
                    .col(Notices::NoticeType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notice_attachments_notice_id")
                    .table(NoticeAttachments::Table)
                    .col(NoticeAttachments::NoticeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NoticeReads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NoticeAttachments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notices {
    #[sea_orm(iden = "notices")]
    Table,
    Id,
    Title,
    Content,
    NoticeType,
    CourseId,
    DepartmentId,
    CreatedBy,
    ExpiryDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NoticeAttachments {
    #[sea_orm(iden = "notice_attachments")]
    Table,
    Id,
    NoticeId,
    FileName,
    FilePath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NoticeReads {
    #[sea_orm(iden = "notice_reads")]
    Table,
    Id,
    NoticeId,
    UserId,
    ReadAt,
}
