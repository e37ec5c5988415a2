use std::collections::HashSet;

use super::{SeaOrmStorage, is_unique_violation, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{notice_attachments, notice_reads, notices};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    notices::{
        entities::{Notice, NoticeAttachment, NoticeAudience, NoticeType},
        requests::{AttachmentInput, NewNotice, NoticeChanges, NoticeFilter},
        responses::{NoticeListItem, NoticeListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

/// 受众过滤条件，管理员不过滤
fn audience_condition(audience: &NoticeAudience) -> Option<Condition> {
    match audience {
        NoticeAudience::Everything => None,
        NoticeAudience::Scoped {
            course_ids,
            department_id,
            author_id,
        } => {
            let mut cond = Condition::any()
                .add(notices::Column::NoticeType.eq(NoticeType::General.to_string()));

            if !course_ids.is_empty() {
                cond = cond.add(
                    Condition::all()
                        .add(notices::Column::NoticeType.eq(NoticeType::Course.to_string()))
                        .add(notices::Column::CourseId.is_in(course_ids.clone())),
                );
            }
            if let Some(department_id) = department_id {
                cond = cond.add(
                    Condition::all()
                        .add(notices::Column::NoticeType.eq(NoticeType::Department.to_string()))
                        .add(notices::Column::DepartmentId.eq(*department_id)),
                );
            }
            if let Some(author_id) = author_id {
                cond = cond.add(notices::Column::CreatedBy.eq(*author_id));
            }
            Some(cond)
        }
    }
}

fn visible_notices(audience: &NoticeAudience, include_expired: bool, now: i64) -> Select<Notices> {
    let mut select = Notices::find();

    if let Some(cond) = audience_condition(audience) {
        select = select.filter(cond);
    }
    if !include_expired {
        select = select.filter(
            Condition::any()
                .add(notices::Column::ExpiryDate.is_null())
                .add(notices::Column::ExpiryDate.gt(now)),
        );
    }

    select
}

async fn insert_attachments<C: ConnectionTrait>(
    conn: &C,
    notice_id: i64,
    attachments: Vec<AttachmentInput>,
    now: i64,
) -> std::result::Result<(), DbErr> {
    for attachment in attachments {
        NoticeAttachmentActiveModel {
            notice_id: Set(notice_id),
            file_name: Set(attachment.file_name),
            file_path: Set(attachment.file_path),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 发布公告及附件
    pub async fn create_notice_impl(&self, req: NewNotice) -> Result<Notice> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let model = NoticeActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            notice_type: Set(req.notice_type),
            course_id: Set(req.course_id),
            department_id: Set(req.department_id),
            created_by: Set(req.created_by),
            expiry_date: Set(req.expiry_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let notice = model.insert(&txn).await.map_err(write_err("创建公告失败"))?;

        insert_attachments(&txn, notice.id, req.attachments, now)
            .await
            .map_err(write_err("创建公告附件失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(notice.into_notice())
    }

    pub async fn get_notice_by_id_impl(&self, id: i64) -> Result<Option<Notice>> {
        let result = Notices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询公告失败"))?;

        Ok(result.map(|m| m.into_notice()))
    }

    pub async fn list_notice_attachments_impl(
        &self,
        notice_id: i64,
    ) -> Result<Vec<NoticeAttachment>> {
        let result = NoticeAttachments::find()
            .filter(notice_attachments::Column::NoticeId.eq(notice_id))
            .order_by_asc(notice_attachments::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err("查询公告附件失败"))?;

        Ok(result.into_iter().map(|m| m.into_attachment()).collect())
    }

    /// 分页列出可见公告，最新的在前，附带已读状态
    pub async fn list_notices_with_pagination_impl(
        &self,
        audience: NoticeAudience,
        filter: NoticeFilter,
        user_id: i64,
    ) -> Result<NoticeListResponse> {
        let mut select = visible_notices(&audience, filter.include_expired, filter.now);

        if let Some(ref notice_type) = filter.notice_type {
            select = select.filter(notices::Column::NoticeType.eq(notice_type.as_str()));
        }

        select = select
            .order_by_desc(notices::Column::CreatedAt)
            .order_by_desc(notices::Column::Id);

        let paginator = select.paginate(&self.db, filter.size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询公告总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(read_err("查询公告页数失败"))?;
        let items = paginator
            .fetch_page(filter.page - 1)
            .await
            .map_err(read_err("查询公告列表失败"))?;

        let read = self.read_notice_ids(user_id).await?;

        Ok(NoticeListResponse {
            items: items
                .into_iter()
                .map(|m| NoticeListItem {
                    is_read: read.contains(&m.id),
                    notice: m.into_notice(),
                })
                .collect(),
            pagination: PaginationInfo::new(filter.page, filter.size, total, pages),
        })
    }

    async fn read_notice_ids(&self, user_id: i64) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = NoticeReads::find()
            .select_only()
            .column(notice_reads::Column::NoticeId)
            .filter(notice_reads::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询已读记录失败"))?;

        Ok(ids.into_iter().collect())
    }

    /// 记录已读回执，重复记录不报错
    pub async fn mark_notice_read_impl(&self, notice_id: i64, user_id: i64) -> Result<bool> {
        let existing = NoticeReads::find()
            .filter(notice_reads::Column::NoticeId.eq(notice_id))
            .filter(notice_reads::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询已读记录失败"))?;

        if existing.is_some() {
            return Ok(false);
        }

        let model = NoticeReadActiveModel {
            notice_id: Set(notice_id),
            user_id: Set(user_id),
            read_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            // 并发下另一请求已写入
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(write_err("记录已读失败")(e)),
        }
    }

    pub async fn count_notice_reads_impl(&self, notice_id: i64) -> Result<u64> {
        NoticeReads::find()
            .filter(notice_reads::Column::NoticeId.eq(notice_id))
            .count(&self.db)
            .await
            .map_err(read_err("统计已读人数失败"))
    }

    /// 修改公告；提供附件时整体替换
    pub async fn update_notice_impl(
        &self,
        id: i64,
        changes: NoticeChanges,
    ) -> Result<Option<Notice>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let Some(existing) = Notices::find_by_id(id)
            .one(&txn)
            .await
            .map_err(read_err("查询公告失败"))?
        else {
            return Ok(None);
        };

        let mut model: NoticeActiveModel = existing.into();
        model.updated_at = Set(now);
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(content) = changes.content {
            model.content = Set(content);
        }
        if let Some(expiry_date) = changes.expiry_date {
            model.expiry_date = Set(expiry_date);
        }

        let notice = model.update(&txn).await.map_err(write_err("更新公告失败"))?;

        if let Some(attachments) = changes.attachments {
            NoticeAttachments::delete_many()
                .filter(notice_attachments::Column::NoticeId.eq(id))
                .exec(&txn)
                .await
                .map_err(write_err("删除公告附件失败"))?;
            insert_attachments(&txn, id, attachments, now)
                .await
                .map_err(write_err("创建公告附件失败"))?;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(Some(notice.into_notice()))
    }

    /// 删除公告及回执、附件
    pub async fn delete_notice_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        NoticeReads::delete_many()
            .filter(notice_reads::Column::NoticeId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_err("删除已读记录失败"))?;
        NoticeAttachments::delete_many()
            .filter(notice_attachments::Column::NoticeId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_err("删除公告附件失败"))?;
        let result = Notices::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_err("删除公告失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 可见且未过期、尚未读过的公告数
    pub async fn count_unread_notices_impl(
        &self,
        audience: NoticeAudience,
        user_id: i64,
        now: i64,
    ) -> Result<u64> {
        let visible: Vec<i64> = visible_notices(&audience, false, now)
            .select_only()
            .column(notices::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询公告失败"))?;

        let read = self.read_notice_ids(user_id).await?;

        Ok(visible.into_iter().filter(|id| !read.contains(id)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    fn new_notice(
        notice_type: NoticeType,
        course_id: Option<i64>,
        expiry_date: Option<i64>,
    ) -> NewNotice {
        NewNotice {
            title: format!("{notice_type} notice"),
            content: "body".to_string(),
            notice_type: notice_type.to_string(),
            course_id,
            department_id: None,
            created_by: 1,
            expiry_date,
            attachments: vec![AttachmentInput {
                file_name: "a.pdf".to_string(),
                file_path: "/files/a.pdf".to_string(),
            }],
        }
    }

    fn filter(now: i64, include_expired: bool) -> NoticeFilter {
        NoticeFilter {
            page: 1,
            size: 20,
            notice_type: None,
            include_expired,
            now,
        }
    }

    async fn reader(storage: &SeaOrmStorage) -> i64 {
        use crate::models::users::{entities::UserType, requests::CreateUserRequest};

        storage
            .create_user_impl(CreateUserRequest {
                full_name: "Reader".to_string(),
                email: "reader@test.local".to_string(),
                password_hash: "hash".to_string(),
                user_type: UserType::Student,
                phone: None,
                profile: Default::default(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_visibility_expiry_and_read_state() {
        let storage = memory_storage().await;
        let now = chrono::Utc::now().timestamp();
        let user = reader(&storage).await;

        let general = storage
            .create_notice_impl(new_notice(NoticeType::General, None, None))
            .await
            .unwrap();
        storage
            .create_notice_impl(new_notice(NoticeType::General, None, Some(now - 10)))
            .await
            .unwrap();

        let audience = NoticeAudience::Scoped {
            course_ids: vec![],
            department_id: None,
            author_id: None,
        };

        let listed = storage
            .list_notices_with_pagination_impl(audience.clone(), filter(now, false), user)
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 1);
        assert!(!listed.items[0].is_read);

        let all = storage
            .list_notices_with_pagination_impl(NoticeAudience::Everything, filter(now, true), user)
            .await
            .unwrap();
        assert_eq!(all.items.len(), 2);

        assert_eq!(
            storage
                .count_unread_notices_impl(audience.clone(), user, now)
                .await
                .unwrap(),
            1
        );
        assert!(storage.mark_notice_read_impl(general.id, user).await.unwrap());
        assert!(!storage.mark_notice_read_impl(general.id, user).await.unwrap());
        assert_eq!(storage.count_notice_reads_impl(general.id).await.unwrap(), 1);
        assert_eq!(
            storage.count_unread_notices_impl(audience, user, now).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_update_replaces_attachments_and_delete_cleans_up() {
        let storage = memory_storage().await;
        let notice = storage
            .create_notice_impl(new_notice(NoticeType::General, None, None))
            .await
            .unwrap();

        storage
            .update_notice_impl(
                notice.id,
                NoticeChanges {
                    title: Some("changed".to_string()),
                    attachments: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(
            storage
                .list_notice_attachments_impl(notice.id)
                .await
                .unwrap()
                .is_empty()
        );

        assert!(storage.delete_notice_impl(notice.id).await.unwrap());
        assert!(storage.get_notice_by_id_impl(notice.id).await.unwrap().is_none());
    }
}
