//! 课程存储操作

use super::db_errors::{WriteOp, map_read_error, map_write_error};
use super::{RECENT_LIMIT, SeaOrmStorage};
use crate::entity::courses::{ActiveModel, Column, Relation};
use crate::entity::prelude::{Courses, Scores};
use crate::entity::scores::Column as ScoreColumn;
use crate::errors::{RatingsError, Result};
use crate::models::{Course, CreateCourseRequest};
use crate::utils::contains_pattern;
use crate::utils::sql::LIKE_ESCAPE;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn add_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        req.validate()?;
        let now = chrono::Utc::now();

        let model = ActiveModel {
            code: Set(req.code.clone()),
            name: Set(req.name.clone()),
            inserted_at: Set(now),
        };

        Courses::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Insert, "创建课程失败"))?;

        Ok(Course {
            code: req.code,
            name: req.name,
            inserted_at: now,
        })
    }

    /// 批量创建课程
    pub async fn add_courses_impl(&self, courses: Vec<CreateCourseRequest>) -> Result<Vec<Course>> {
        let mut created = Vec::with_capacity(courses.len());
        for course in courses {
            created.push(self.add_course_impl(course).await?);
        }
        Ok(created)
    }

    /// 删除课程
    pub async fn remove_course_impl(&self, code: &str, cascade: bool) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RatingsError::database_connection(format!("开启事务失败: {e}")))?;

        if cascade {
            Scores::delete_many()
                .filter(ScoreColumn::CourseCode.eq(code))
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, WriteOp::Delete, "删除课程评分失败"))?;
        }

        let result = Courses::delete_by_id(code.to_owned())
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Delete, "删除课程失败"))?;

        if result.rows_affected == 0 {
            return Err(RatingsError::not_found(format!("course {code} not found")));
        }

        txn.commit()
            .await
            .map_err(|e| RatingsError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 最近创建的课程
    pub async fn list_last_courses_impl(&self) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .order_by_desc(Column::InsertedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询课程列表失败"))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 某位教师关联的课程（经由评分表）
    pub async fn list_courses_by_professor_impl(&self, professor_id: &str) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .join(JoinType::InnerJoin, Relation::Scores.def())
            .filter(ScoreColumn::ProfessorId.eq(professor_id))
            .distinct()
            .order_by_desc(Column::InsertedAt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师课程失败"))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 按代码或名称子串搜索课程
    pub async fn search_courses_impl(&self, pattern: &str) -> Result<Vec<Course>> {
        let like = contains_pattern(pattern.trim());

        let courses = Courses::find()
            .filter(
                Condition::any()
                    .add(Column::Code.like(LikeExpr::new(like.clone()).escape(LIKE_ESCAPE)))
                    .add(Column::Name.like(LikeExpr::new(like).escape(LIKE_ESCAPE))),
            )
            .order_by_desc(Column::InsertedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "搜索课程失败"))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}
