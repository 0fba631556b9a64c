//! 教师存储操作

use super::db_errors::{WriteOp, map_read_error, map_write_error};
use super::{RECENT_LIMIT, SeaOrmStorage};
use crate::entity::prelude::{Professors, Scores};
use crate::entity::professors::{ActiveModel, Column, Relation};
use crate::entity::scores::Column as ScoreColumn;
use crate::errors::{RatingsError, Result};
use crate::models::Professor;
use crate::utils::contains_pattern;
use crate::utils::sql::LIKE_ESCAPE;
use crate::utils::validate::require_non_empty;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建教师，ID 由存储层生成
    pub async fn add_professor_impl(&self, name: &str) -> Result<Professor> {
        require_non_empty("name", name)?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now();

        let model = ActiveModel {
            id: Set(id.clone()),
            name: Set(name.to_string()),
            inserted_at: Set(now),
        };

        Professors::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Insert, "创建教师失败"))?;

        Ok(Professor {
            id,
            name: name.to_string(),
            inserted_at: now,
        })
    }

    /// 批量创建教师
    pub async fn add_professors_impl(&self, names: Vec<String>) -> Result<Vec<Professor>> {
        let mut created = Vec::with_capacity(names.len());
        for name in &names {
            created.push(self.add_professor_impl(name).await?);
        }
        Ok(created)
    }

    /// 删除教师
    pub async fn remove_professor_impl(&self, id: &str, cascade: bool) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RatingsError::database_connection(format!("开启事务失败: {e}")))?;

        if cascade {
            Scores::delete_many()
                .filter(ScoreColumn::ProfessorId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, WriteOp::Delete, "删除教师评分失败"))?;
        }

        let result = Professors::delete_by_id(id.to_owned())
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Delete, "删除教师失败"))?;

        if result.rows_affected == 0 {
            return Err(RatingsError::not_found(format!("professor {id} not found")));
        }

        txn.commit()
            .await
            .map_err(|e| RatingsError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 最近创建的教师
    pub async fn list_last_professors_impl(&self) -> Result<Vec<Professor>> {
        let professors = Professors::find()
            .order_by_desc(Column::InsertedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师列表失败"))?;

        Ok(professors.into_iter().map(|m| m.into_professor()).collect())
    }

    /// 某门课程关联的教师（经由评分表）
    pub async fn list_professors_by_course_impl(&self, course_code: &str) -> Result<Vec<Professor>> {
        let professors = Professors::find()
            .join(JoinType::InnerJoin, Relation::Scores.def())
            .filter(ScoreColumn::CourseCode.eq(course_code))
            .distinct()
            .order_by_desc(Column::InsertedAt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询课程教师失败"))?;

        Ok(professors.into_iter().map(|m| m.into_professor()).collect())
    }

    /// 通过姓名获取教师 ID
    pub async fn get_professor_id_by_name_impl(&self, name: &str) -> Result<String> {
        let professor = Professors::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?;

        professor
            .map(|p| p.id)
            .ok_or_else(|| RatingsError::not_found(format!("professor named {name} not found")))
    }

    /// 按姓名子串搜索教师
    pub async fn search_professors_impl(&self, pattern: &str) -> Result<Vec<Professor>> {
        let like = LikeExpr::new(contains_pattern(pattern.trim())).escape(LIKE_ESCAPE);

        let professors = Professors::find()
            .filter(Column::Name.like(like))
            .order_by_desc(Column::InsertedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "搜索教师失败"))?;

        Ok(professors.into_iter().map(|m| m.into_professor()).collect())
    }
}
