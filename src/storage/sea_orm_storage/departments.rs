use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::errors::Result;
use crate::models::departments::entities::Department;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出所有院系
    pub async fn list_departments_impl(&self) -> Result<Vec<Department>> {
        let result = Departments::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(read_err("查询院系列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_department()).collect())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询院系失败"))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn get_department_by_code_impl(&self, code: &str) -> Result<Option<Department>> {
        let result = Departments::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(read_err("查询院系失败"))?;

        Ok(result.map(|m| m.into_department()))
    }

    /// 创建院系
    pub async fn create_department_impl(&self, code: &str, name: &str) -> Result<Department> {
        let model = ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(write_err("创建院系失败"))?;

        Ok(result.into_department())
    }
}
